//! Beam model - loads, supports, analysis and result queries

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::{solve_axial, solve_flexure, AnalysisOptions, LoadResponse};
use crate::elements::{Channel, Section, Support};
use crate::error::{ensure_finite, ensure_positive, BeamError, BeamResult};
use crate::loads::Load;
use crate::math::{round_to, Piecewise, Polynomial};
use crate::results::{
    AnalysisResult, BeamReport, Curve, Quantity, Query, QueryAnnotation, QueryValue, Reactions,
    SupportReaction,
};

/// A straight beam on `[0, span]` with its loads and supports
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "BeamData")]
pub struct Beam {
    span: f64,
    section: Section,
    loads: Vec<Load>,
    supports: Vec<Support>,
    query_points: Vec<f64>,
    options: AnalysisOptions,

    /// Integration chain per distinct load
    #[serde(skip)]
    cache: HashMap<Load, Arc<LoadResponse>>,
    /// Analysis solution
    #[serde(skip)]
    solution: Option<AnalysisResult>,
}

/// Serialized beam, rebuilt through the validating constructors
#[derive(Deserialize)]
struct BeamData {
    span: f64,
    #[serde(default)]
    section: Section,
    #[serde(default)]
    loads: Vec<Load>,
    #[serde(default)]
    supports: Vec<Support>,
    #[serde(default)]
    query_points: Vec<f64>,
    #[serde(default)]
    options: AnalysisOptions,
}

impl TryFrom<BeamData> for Beam {
    type Error = BeamError;

    fn try_from(data: BeamData) -> BeamResult<Self> {
        let mut beam = Beam::with_section(data.span, data.section)?;
        beam.options = data.options;
        beam.add_supports(data.supports)?;
        beam.add_loads(data.loads)?;
        beam.add_query_points(&data.query_points)?;
        Ok(beam)
    }
}

impl Default for Beam {
    fn default() -> Self {
        Self {
            span: 10.0,
            section: Section::default(),
            loads: Vec::new(),
            supports: Vec::new(),
            query_points: Vec::new(),
            options: AnalysisOptions::default(),
            cache: HashMap::new(),
            solution: None,
        }
    }
}

impl Beam {
    /// Create a beam of length `span` with Young's modulus `e`, second
    /// moment of area `i` and cross-sectional area `a`
    pub fn new(span: f64, e: f64, i: f64, a: f64) -> BeamResult<Self> {
        Self::with_section(span, Section::new(e, i, a)?)
    }

    pub fn with_section(span: f64, section: Section) -> BeamResult<Self> {
        let section = Section::new(section.e, section.i, section.a)?;
        Ok(Self {
            span: ensure_positive("span", span)?,
            section,
            ..Self::default()
        })
    }

    pub fn span(&self) -> f64 {
        self.span
    }

    pub fn section(&self) -> &Section {
        &self.section
    }

    pub fn loads(&self) -> &[Load] {
        &self.loads
    }

    pub fn supports(&self) -> &[Support] {
        &self.supports
    }

    pub fn query_points(&self) -> &[f64] {
        &self.query_points
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Replace the analysis options. Clears any previous solution.
    pub fn set_options(&mut self, options: AnalysisOptions) {
        if options.quadrature_panels != self.options.quadrature_panels {
            self.cache.clear();
        }
        self.options = options;
        self.solution = None;
    }

    // ========================
    // Model Building Methods
    // ========================

    /// Add loads. Either all loads are added or none are.
    pub fn add_loads<I, L>(&mut self, loads: I) -> BeamResult<()>
    where
        I: IntoIterator<Item = L>,
        L: Into<Load>,
    {
        let loads: Vec<Load> = loads.into_iter().map(Into::into).collect();
        for load in &loads {
            load.validate_placement(self.span)?;
        }
        for load in loads {
            log::debug!("Adding {}", load);
            self.loads.push(load);
        }
        self.solution = None;
        Ok(())
    }

    /// Remove every load equal to one of `loads`. Loads not on the beam
    /// are ignored.
    pub fn remove_loads<I, L>(&mut self, loads: I)
    where
        I: IntoIterator<Item = L>,
        L: Into<Load>,
    {
        let targets: Vec<Load> = loads.into_iter().map(Into::into).collect();
        let before = self.loads.len();
        self.loads.retain(|l| !targets.contains(l));
        if self.loads.len() != before {
            let remaining = &self.loads;
            self.cache.retain(|load, _| remaining.contains(load));
            self.solution = None;
        }
    }

    pub fn clear_loads(&mut self) {
        self.loads.clear();
        self.cache.clear();
        self.solution = None;
    }

    /// Add supports. Positions must lie on the beam and be unique.
    pub fn add_supports<I>(&mut self, supports: I) -> BeamResult<()>
    where
        I: IntoIterator<Item = Support>,
    {
        let supports: Vec<Support> = supports.into_iter().collect();
        let mut taken: Vec<f64> = self.supports.iter().map(|s| s.position).collect();
        for support in &supports {
            support.validate()?;
            if support.position > self.span {
                return Err(BeamError::out_of_bounds("support", support.position, self.span));
            }
            if taken.contains(&support.position) {
                return Err(BeamError::DuplicateSupport(support.position));
            }
            taken.push(support.position);
        }
        for support in supports {
            log::debug!("Adding {}", support);
            self.supports.push(support);
        }
        self.solution = None;
        Ok(())
    }

    /// Remove supports equal to any of `supports`; absent ones are ignored
    pub fn remove_supports<I>(&mut self, supports: I)
    where
        I: IntoIterator<Item = Support>,
    {
        let targets: Vec<Support> = supports.into_iter().collect();
        let before = self.supports.len();
        self.supports.retain(|s| !targets.contains(s));
        if self.supports.len() != before {
            self.solution = None;
        }
    }

    pub fn clear_supports(&mut self) {
        self.supports.clear();
        self.solution = None;
    }

    /// Add coordinates to annotate in reports
    pub fn add_query_points(&mut self, points: &[f64]) -> BeamResult<()> {
        for &x in points {
            self.check_coordinate("query point", x)?;
        }
        for &x in points {
            if !self.query_points.contains(&x) {
                self.query_points.push(x);
            }
        }
        Ok(())
    }

    pub fn remove_query_points(&mut self, points: &[f64]) {
        self.query_points.retain(|x| !points.contains(x));
    }

    pub fn clear_query_points(&mut self) {
        self.query_points.clear();
    }

    fn check_coordinate(&self, item: &str, x: f64) -> BeamResult<f64> {
        ensure_finite(item, x)?;
        if x < 0.0 || x > self.span {
            return Err(BeamError::out_of_bounds(item, x, self.span));
        }
        Ok(x)
    }

    // ========================
    // Analysis Methods
    // ========================

    /// Unknown reactions minus independent equilibrium equations.
    ///
    /// Negative when the beam is a mechanism, zero when statically
    /// determinate, positive when indeterminate.
    pub fn degree_of_indeterminacy(&self) -> i32 {
        let count = |channel: Channel| {
            self.supports
                .iter()
                .filter(|s| s.restraint(channel).is_reactive())
                .count() as i32
        };
        let axial = count(Channel::Axial) - 1;
        let flexural = count(Channel::Transverse) + count(Channel::Rotational) - 2;
        if axial < 0 || flexural < 0 {
            axial.min(flexural)
        } else {
            axial + flexural
        }
    }

    fn check_stability(&self) -> BeamResult<()> {
        let reactive = |channel: Channel| {
            self.supports
                .iter()
                .filter(|s| s.restraint(channel).is_reactive())
                .count()
        };
        if reactive(Channel::Axial) < 1 {
            return Err(BeamError::Unstable(
                "at least one support must restrain axial movement".to_string(),
            ));
        }
        if reactive(Channel::Transverse) + reactive(Channel::Rotational) < 2 {
            return Err(BeamError::Unstable(
                "at least two transverse or rotational restraints are required".to_string(),
            ));
        }
        Ok(())
    }

    /// Run the analysis with the current options
    pub fn analyse(&mut self) -> BeamResult<()> {
        self.solution = None;
        self.check_stability()?;

        let options = self.options.clone();
        if options.log {
            log::info!(
                "Analysing {} m beam: {} loads, {} supports, degree of indeterminacy {}",
                self.span,
                self.loads.len(),
                self.supports.len(),
                self.degree_of_indeterminacy()
            );
        }

        let combined = self.combined_response(options.quadrature_panels);
        let ei = self.section.ei();
        let ea = self.section.ea();

        let flexure = solve_flexure(&self.supports, &combined, ei, &options)?;
        let axial = solve_axial(&self.supports, &combined, ea, &options)?;

        let mut reactions = vec![Reactions::default(); self.supports.len()];
        for &(s, r) in &flexure.transverse {
            reactions[s].transverse = r;
        }
        for &(s, r) in &flexure.moment {
            reactions[s].moment = r;
        }
        for &(s, r) in &axial.reactions {
            reactions[s].axial = r;
        }

        // Superpose reaction terms onto the load chain
        let mut normal = combined.normal;
        let mut normal_integral = combined.normal_integral;
        let mut shear = combined.shear;
        let mut moment = combined.moment;
        let mut slope = combined.slope;
        let mut deflection = combined.deflection;

        for (support, r) in self.supports.iter().zip(&reactions) {
            let p = support.position;
            if r.axial != 0.0 {
                normal = &normal + &Piecewise::macaulay(-r.axial, p, 0);
                normal_integral = &normal_integral + &Piecewise::macaulay(-r.axial, p, 1);
            }
            if r.transverse != 0.0 {
                shear = &shear + &Piecewise::macaulay(r.transverse, p, 0);
                moment = &moment + &Piecewise::macaulay(r.transverse, p, 1);
                slope = &slope + &Piecewise::macaulay(r.transverse / 2.0, p, 2);
                deflection = &deflection + &Piecewise::macaulay(r.transverse / 6.0, p, 3);
            }
            if r.moment != 0.0 {
                moment = &moment + &Piecewise::macaulay(r.moment, p, 0);
                slope = &slope + &Piecewise::macaulay(r.moment, p, 1);
                deflection = &deflection + &Piecewise::macaulay(r.moment / 2.0, p, 2);
            }
        }

        slope = &slope + &Piecewise::polynomial(Polynomial::constant(flexure.c1));
        deflection =
            &deflection + &Piecewise::polynomial(Polynomial::new(vec![flexure.c2, flexure.c1]));

        let offset = axial.origin_displacement - normal_integral.eval(axial.origin) / ea;
        let axial_deflection =
            &normal_integral.scaled(1.0 / ea) + &Piecewise::polynomial(Polynomial::constant(offset));

        let reactions: Vec<SupportReaction> = self
            .supports
            .iter()
            .zip(reactions)
            .map(|(support, r)| SupportReaction {
                position: support.position,
                reactions: Reactions::new(
                    round_to(r.axial, options.reaction_precision),
                    round_to(r.transverse, options.reaction_precision),
                    round_to(r.moment, options.reaction_precision),
                ),
            })
            .collect();

        if options.log {
            for r in &reactions {
                log::info!(
                    "Reaction at {}: axial = {}, transverse = {}, moment = {}",
                    r.position,
                    r.reactions.axial,
                    r.reactions.transverse,
                    r.reactions.moment
                );
            }
        }

        self.solution = Some(AnalysisResult {
            reactions,
            normal_force: normal,
            shear_force: shear,
            bending_moment: moment,
            slope: slope.scaled(1.0 / ei),
            deflection: deflection.scaled(1.0 / ei),
            axial_deflection,
        });
        Ok(())
    }

    /// Replace the options and analyse
    pub fn analyse_with(&mut self, options: AnalysisOptions) -> BeamResult<()> {
        self.set_options(options);
        self.analyse()
    }

    /// Superposed integration chain of all loads, filling the cache
    fn combined_response(&mut self, panels: usize) -> LoadResponse {
        let mut combined = LoadResponse::default();
        for load in &self.loads {
            let response = self
                .cache
                .entry(load.clone())
                .or_insert_with(|| {
                    log::trace!("Integrating {}", load);
                    Arc::new(LoadResponse::new(load, panels))
                });
            combined = &combined + response.as_ref();
        }
        combined
    }

    // ========================
    // Result Access Methods
    // ========================

    /// Check if the beam has been analysed since the last change
    pub fn is_analysed(&self) -> bool {
        self.solution.is_some()
    }

    pub fn result(&self) -> BeamResult<&AnalysisResult> {
        self.solution.as_ref().ok_or(BeamError::NotAnalyzed)
    }

    /// Reactions at the support at `position`
    pub fn reaction(&self, position: f64) -> Option<Reactions> {
        self.solution.as_ref()?.reaction(position)
    }

    /// One reaction component at the support at `position`
    pub fn reaction_component(&self, position: f64, channel: Channel) -> Option<f64> {
        let r = self.reaction(position)?;
        Some(match channel {
            Channel::Axial => r.axial,
            Channel::Transverse => r.transverse,
            Channel::Rotational => r.moment,
        })
    }

    /// Evaluate a result function
    pub fn query(&self, quantity: Quantity, query: &Query) -> BeamResult<QueryValue> {
        let f = self.result()?.function(quantity);
        let precision = self.options.value_precision;
        let round = |v: f64| round_to(v, precision);

        if query.max || query.min || query.abs_max {
            let (min, max) = f.extrema(0.0, self.span, self.options.sample_points);
            let (min, max) = (round(min), round(max));
            let value = if query.max {
                max
            } else if query.min {
                min
            } else {
                max.abs().max(min.abs())
            };
            return Ok(QueryValue::Scalar(value));
        }

        match query.points.as_slice() {
            [] => Err(BeamError::invalid_input(
                "query",
                "give at least one coordinate or set max, min or abs_max",
            )),
            [x] => Ok(QueryValue::Scalar(round(f.eval(self.check_coordinate("query point", *x)?)))),
            points => points
                .iter()
                .map(|&x| Ok(round(f.eval(self.check_coordinate("query point", x)?))))
                .collect::<BeamResult<Vec<f64>>>()
                .map(QueryValue::Values),
        }
    }

    /// Normal force, tension positive
    pub fn normal_force(&self, query: &Query) -> BeamResult<QueryValue> {
        self.query(Quantity::NormalForce, query)
    }

    pub fn shear_force(&self, query: &Query) -> BeamResult<QueryValue> {
        self.query(Quantity::ShearForce, query)
    }

    /// Bending moment, sagging positive
    pub fn bending_moment(&self, query: &Query) -> BeamResult<QueryValue> {
        self.query(Quantity::BendingMoment, query)
    }

    pub fn slope(&self, query: &Query) -> BeamResult<QueryValue> {
        self.query(Quantity::Slope, query)
    }

    /// Transverse deflection, positive upward
    pub fn deflection(&self, query: &Query) -> BeamResult<QueryValue> {
        self.query(Quantity::Deflection, query)
    }

    pub fn axial_deflection(&self, query: &Query) -> BeamResult<QueryValue> {
        self.query(Quantity::AxialDeflection, query)
    }

    /// Sampled curves, reactions and query annotations for rendering
    pub fn report(&self) -> BeamResult<BeamReport> {
        let result = self.result()?;
        let precision = self.options.value_precision;
        let n = self.options.sample_points;

        let curves = Quantity::ALL
            .iter()
            .map(|&quantity| {
                let f = result.function(quantity);
                let (x, y): (Vec<f64>, Vec<f64>) = f
                    .sample(0.0, self.span, n)
                    .into_iter()
                    .map(|(x, y)| (x, round_to(y, precision)))
                    .unzip();
                let (min, max) = f.extrema(0.0, self.span, n);
                Curve {
                    quantity,
                    x,
                    y,
                    max: round_to(max, precision),
                    min: round_to(min, precision),
                }
            })
            .collect();

        let annotations = self
            .query_points
            .iter()
            .flat_map(|&x| {
                Quantity::ALL.iter().map(move |&quantity| QueryAnnotation {
                    quantity,
                    x,
                    value: round_to(result.function(quantity).eval(x), precision),
                })
            })
            .collect();

        Ok(BeamReport {
            span: self.span,
            section: self.section,
            supports: self.supports.clone(),
            loads: self.loads.clone(),
            reactions: result.reactions.clone(),
            curves,
            annotations,
        })
    }
}

impl fmt::Display for Beam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Beam of span {} (E = {}, I = {}, A = {})",
            self.span, self.section.e, self.section.i, self.section.a
        )?;
        for support in &self.supports {
            writeln!(f, "  {}", support)?;
        }
        for load in &self.loads {
            writeln!(f, "  {}", load)?;
        }
        Ok(())
    }
}
