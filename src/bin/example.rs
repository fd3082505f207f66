//! Beam Solver Example - Indeterminate Beam with Mixed Loads

use anyhow::Result;
use beam_solver::prelude::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== Beam Solver Example: Indeterminate Beam ===\n");

    //   |=========================================|
    //   ^ pin          ^ spring                   fixed
    //   0             3.0                          7.5
    //
    // E = 200 GPa, I = 9.05e-6 m^4, A = 2.3e-3 m^2, forces in kN
    let mut beam = Beam::new(7.5, 200e6, 9.05e-6, 2.3e-3)?;

    beam.add_supports([
        Support::pinned(0.0)?,
        Support::roller(3.0)?.with_ky(1000.0)?,
        Support::fixed(7.5)?,
    ])?;

    let loads: Vec<Load> = vec![
        PointForce::new(-15.0, 2.0, 60.0)?.into(),
        PointTorque::new(10.0, 3.5)?.into(),
        Udl::vertical(-5.0, (0.0, 3.0))?.into(),
        TrapezoidalLoad::vertical((-2.0, -6.0), (3.0, 7.5))?.into(),
        DistributedLoad::vertical("-(x - 5)^2 / 4", (4.0, 6.0))?.into(),
    ];
    beam.add_loads(loads)?;
    beam.add_query_points(&[1.5, 3.0, 5.25])?;

    println!("{}", beam);
    println!("Degree of indeterminacy: {}\n", beam.degree_of_indeterminacy());

    beam.analyse_with(AnalysisOptions::default().with_logging())?;

    println!("=== Reactions ===");
    for support in beam.supports() {
        if let Some(r) = beam.reaction(support.position) {
            println!(
                "  x = {:>4}: Fx = {:>10.5}, Fy = {:>10.5}, M = {:>10.5}",
                support.position, r.axial, r.transverse, r.moment
            );
        }
    }

    println!("\n=== Extremes ===");
    let quantities = [
        ("Normal force (kN)", beam.normal_force(&Query::abs_max())?),
        ("Shear force (kN)", beam.shear_force(&Query::abs_max())?),
        ("Bending moment (kN.m)", beam.bending_moment(&Query::abs_max())?),
        ("Deflection (m)", beam.deflection(&Query::abs_max())?),
    ];
    for (name, value) in quantities {
        println!("  {:<24} {:>10}", name, value.scalar().unwrap_or(f64::NAN));
    }

    println!("\n=== Query points ===");
    let report = beam.report()?;
    for annotation in &report.annotations {
        if annotation.quantity == Quantity::BendingMoment || annotation.quantity == Quantity::Deflection {
            println!(
                "  x = {:>5}: {:<16} {:>10}",
                annotation.x,
                annotation.quantity.to_string(),
                annotation.value
            );
        }
    }

    Ok(())
}
