use approx::assert_relative_eq;
use beam_solver::prelude::*;

const E: f64 = 200e6;
const I: f64 = 9.05e-6;
const A: f64 = 2.3e-3;

fn mixed_loads() -> Vec<Load> {
    vec![
        PointForce::new(-12.0, 1.5, 75.0).unwrap().into(),
        PointTorque::new(-4.0, 6.0).unwrap().into(),
        Udl::vertical(-3.0, (2.0, 7.0)).unwrap().into(),
        TrapezoidalLoad::new((-1.0, -4.0), (0.5, 4.5), 100.0).unwrap().into(),
        DistributedLoad::vertical("-0.5*x^2 + 2", (6.0, 9.0)).unwrap().into(),
    ]
}

fn determinate_beam(loads: Vec<Load>) -> Beam {
    let mut beam = Beam::new(9.0, E, I, A).unwrap();
    beam.add_supports([Support::pinned(0.0).unwrap(), Support::roller(9.0).unwrap()])
        .unwrap();
    beam.add_loads(loads).unwrap();
    beam
}

fn indeterminate_beam(loads: Vec<Load>) -> Beam {
    let mut beam = Beam::new(9.0, E, I, A).unwrap();
    beam.add_supports([
        Support::fixed(0.0).unwrap(),
        Support::roller(4.0).unwrap().with_ky(500.0).unwrap(),
        Support::new(9.0, (true, true, false)).unwrap(),
    ])
    .unwrap();
    beam.add_loads(loads).unwrap();
    beam
}

fn load_totals(loads: &[Load]) -> (f64, f64, f64) {
    let panels = AnalysisOptions::default().quadrature_panels;
    loads.iter().fold((0.0, 0.0, 0.0), |(fx, fy, m), load| {
        let (x, y) = load.resultant(panels);
        (fx + x, fy + y, m + load.moment_about_origin(panels))
    })
}

#[test]
fn determinate_beam_is_in_equilibrium() {
    let loads = mixed_loads();
    let (fx, fy, m0) = load_totals(&loads);
    let mut beam = determinate_beam(loads);
    beam.analyse().unwrap();

    let (mut rx, mut ry, mut rm) = (0.0, 0.0, 0.0);
    for support in beam.supports() {
        let r = beam.reaction(support.position).unwrap();
        rx += r.axial;
        ry += r.transverse;
        rm += r.transverse * support.position - r.moment;
    }
    assert_relative_eq!(rx + fx, 0.0, epsilon = 1e-4);
    assert_relative_eq!(ry + fy, 0.0, epsilon = 1e-4);
    assert_relative_eq!(rm + m0, 0.0, epsilon = 1e-3);

    // Free ends carry no shear or moment once reactions are included
    let result = beam.result().unwrap();
    assert_relative_eq!(result.shear_force.eval(9.0), 0.0, epsilon = 1e-9);
    assert_relative_eq!(result.bending_moment.eval(9.0), 0.0, epsilon = 1e-9);
    assert_relative_eq!(result.normal_force.eval(9.0), 0.0, epsilon = 1e-9);
}

#[test]
fn indeterminate_beam_is_in_equilibrium() {
    let loads = mixed_loads();
    let (_, fy, _) = load_totals(&loads);
    let mut beam = indeterminate_beam(loads);
    beam.analyse().unwrap();
    assert_eq!(beam.degree_of_indeterminacy(), 3);

    let ry: f64 = beam
        .supports()
        .iter()
        .map(|s| beam.reaction(s.position).unwrap().transverse)
        .sum();
    assert_relative_eq!(ry + fy, 0.0, epsilon = 1e-4);

    let result = beam.result().unwrap();
    assert_relative_eq!(result.deflection.eval(0.0), 0.0, epsilon = 1e-12);
    assert_relative_eq!(result.slope.eval(0.0), 0.0, epsilon = 1e-12);
    assert_relative_eq!(result.deflection.eval(9.0), 0.0, epsilon = 1e-12);
    // Spring reaction opposes the displacement it sees
    let spring = beam.reaction(4.0).unwrap().transverse;
    assert_relative_eq!(spring, -500.0 * result.deflection.eval(4.0), epsilon = 1e-4);
}

#[test]
fn reactions_superpose() {
    let loads = mixed_loads();
    let (first, second) = loads.split_at(2);

    let mut combined = indeterminate_beam(loads.clone());
    let mut only_first = indeterminate_beam(first.to_vec());
    let mut only_second = indeterminate_beam(second.to_vec());
    combined.analyse().unwrap();
    only_first.analyse().unwrap();
    only_second.analyse().unwrap();

    for x in [0.0, 4.0, 9.0] {
        let c = combined.reaction(x).unwrap();
        let a = only_first.reaction(x).unwrap();
        let b = only_second.reaction(x).unwrap();
        assert_relative_eq!(c.axial, a.axial + b.axial, epsilon = 2e-5);
        assert_relative_eq!(c.transverse, a.transverse + b.transverse, epsilon = 2e-5);
        assert_relative_eq!(c.moment, a.moment + b.moment, epsilon = 2e-5);
    }

    let (dc, da, db) = (
        &combined.result().unwrap().deflection,
        &only_first.result().unwrap().deflection,
        &only_second.result().unwrap().deflection,
    );
    for x in [1.0, 3.3, 6.5, 8.0] {
        assert_relative_eq!(dc.eval(x), da.eval(x) + db.eval(x), epsilon = 1e-10);
    }
}

#[test]
fn derivative_relations_hold_between_discontinuities() {
    let mut beam = indeterminate_beam(mixed_loads());
    beam.analyse().unwrap();
    let result = beam.result().unwrap();
    let ei = E * I;
    let h = 1e-4;
    let diff = |f: &beam_solver::math::Piecewise, x: f64| (f.eval(x + h) - f.eval(x - h)) / (2.0 * h);

    // Inside the UDL only (2 < x < 7, away from 4, 4.5 and 6): w_y = -3
    for x in [2.5, 3.5, 5.0] {
        let w = if x < 4.5 {
            // Trapezoid at 100 degrees adds its transverse part
            let q = -1.0 + (-4.0 + 1.0) * (x - 0.5) / 4.0;
            -3.0 + q * 100f64.to_radians().sin()
        } else {
            -3.0
        };
        assert_relative_eq!(diff(&result.shear_force, x), w, epsilon = 1e-5);
        assert_relative_eq!(diff(&result.bending_moment, x), result.shear_force.eval(x), epsilon = 1e-5);
        assert_relative_eq!(diff(&result.slope, x), result.bending_moment.eval(x) / ei, epsilon = 1e-8);
        assert_relative_eq!(diff(&result.deflection, x), result.slope.eval(x), epsilon = 1e-8);
    }
}

#[test]
fn udl_matches_equal_ended_trapezoid() {
    let make = |load: Load| {
        let mut beam = Beam::new(6.0, E, I, A).unwrap();
        beam.add_supports([Support::fixed(0.0).unwrap(), Support::roller(6.0).unwrap()])
            .unwrap();
        beam.add_loads([load]).unwrap();
        beam.analyse().unwrap();
        beam
    };
    let udl = make(Udl::vertical(-4.0, (1.0, 5.0)).unwrap().into());
    let trap = make(TrapezoidalLoad::vertical((-4.0, -4.0), (1.0, 5.0)).unwrap().into());

    for x in [0.0, 6.0] {
        assert_eq!(udl.reaction(x), trap.reaction(x));
    }
    for quantity in Quantity::ALL {
        assert_eq!(
            udl.query(quantity, &Query::abs_max()).unwrap(),
            trap.query(quantity, &Query::abs_max()).unwrap()
        );
    }
}

#[test]
fn removing_items_never_added_changes_nothing() {
    let mut beam = determinate_beam(mixed_loads());
    beam.analyse().unwrap();
    let before = beam.reaction(0.0);

    beam.remove_loads([PointForce::vertical(-1.0, 3.0).unwrap()]);
    beam.remove_supports([Support::fixed(4.0).unwrap()]);
    assert!(beam.is_analysed());
    assert_eq!(beam.reaction(0.0), before);
    assert_eq!(beam.loads().len(), 5);
    assert_eq!(beam.supports().len(), 2);

    // Removing a load that is present does clear the solution
    beam.remove_loads([Udl::vertical(-3.0, (2.0, 7.0)).unwrap()]);
    assert!(!beam.is_analysed());
    assert_eq!(beam.loads().len(), 4);
}

#[test]
fn analysis_errors() {
    let mut beam = Beam::new(5.0, E, I, A).unwrap();
    assert!(matches!(beam.analyse(), Err(BeamError::Unstable(_))));

    beam.add_supports([Support::roller(0.0).unwrap(), Support::roller(5.0).unwrap()])
        .unwrap();
    assert!(matches!(beam.analyse(), Err(BeamError::Unstable(_))));
    assert!(matches!(beam.report(), Err(BeamError::NotAnalyzed)));

    // Rotation restrained twice but nothing carries vertical load
    let mut beam = Beam::new(5.0, E, I, A).unwrap();
    beam.add_supports([
        Support::new(0.0, (true, false, true)).unwrap(),
        Support::new(5.0, (false, false, true)).unwrap(),
    ])
    .unwrap();
    beam.add_loads([PointForce::vertical(-1.0, 2.0).unwrap()]).unwrap();
    assert!(matches!(beam.analyse(), Err(BeamError::SingularSystem(_))));

    assert!(Beam::new(0.0, E, I, A).is_err());
    assert!(Beam::new(5.0, E, -I, A).is_err());
    assert!(Support::from_tokens(0.0, ["rigid", "rigid", "250"]).is_err());
}

#[test]
fn report_serializes_reactions_and_curves() {
    let mut beam = determinate_beam(mixed_loads());
    beam.add_query_points(&[4.5]).unwrap();
    beam.analyse_with(AnalysisOptions::default().with_sample_points(101)).unwrap();

    let report = beam.report().unwrap();
    assert_eq!(report.reactions.len(), 2);
    let shear = report.curve(Quantity::ShearForce).unwrap();
    assert_eq!(shear.x.len(), 101);
    assert_eq!(shear.x[100], 9.0);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["span"], 9.0);
    assert_eq!(json["loads"].as_array().unwrap().len(), 5);
    assert_eq!(json["loads"][4]["type"], "distributed");
    assert_eq!(json["loads"][4]["expr"], "-0.5*x^2+2");
    assert_eq!(json["annotations"].as_array().unwrap().len(), 6);
}
