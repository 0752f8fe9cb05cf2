use beamx::{Beam, Quantity, Solution};
use std::fmt::Write;

/// Render a textual summary of a solved beam.
///
/// The report follows the order of a hand calculation: the beam, the load function,
/// the general expressions, the boundary equations used for the constants, the solved
/// expressions and finally reactions and extreme values.
#[must_use]
pub fn render_summary(beam: &Beam, solution: &Solution) -> String {
    let mut output = String::new();

    // State the problem first: span, supports and loads as they were entered.
    writeln!(
        &mut output,
        "Beam of length {} ({} analysis)",
        beam.length(),
        solution.mode
    )
    .expect("writing to string cannot fail");
    for support in beam.supports() {
        writeln!(&mut output, "  {support}").expect("writing to string cannot fail");
    }
    for load in beam.loads() {
        writeln!(&mut output, "  {load}").expect("writing to string cannot fail");
    }

    // The load intensity and its integrals with the constants still symbolic.
    // Brackets are Macaulay brackets, <x - a>^n is zero left of `a`.
    // See: https://en.wikipedia.org/wiki/Singularity_function
    writeln!(&mut output, "\nq(x) = {}", solution.chain.load)
        .expect("writing to string cannot fail");
    for quantity in solution.mode.quantities() {
        if let Some(expression) = solution.chain.get(*quantity) {
            writeln!(&mut output, "{quantity}(x) = {expression}")
                .expect("writing to string cannot fail");
        }
    }

    // Only the equations the constants were solved from are listed. Unused known
    // values were checked against the result.
    output.push_str("\nBoundary equations:\n");
    for equation in &solution.equations {
        writeln!(
            &mut output,
            "  {}({}) = {}",
            equation.quantity, equation.position, equation.value
        )
        .expect("writing to string cannot fail");
    }
    for (constant, value) in &solution.constants {
        writeln!(&mut output, "  {constant} = {value:+.4}").expect("writing to string cannot fail");
    }

    output.push_str("\nSolved:\n");
    for quantity in solution.mode.quantities() {
        if let Some(expression) = solution.solved.get(*quantity) {
            writeln!(&mut output, "  {quantity}(x) = {expression}")
                .expect("writing to string cannot fail");
        }
    }

    // Reactions balance the applied loads, so the forces here should add up to the
    // load resultant. See https://en.wikipedia.org/wiki/Statics.
    if !solution.reactions.is_empty() {
        output.push_str("\nReactions:\n");
    }
    for reaction in &solution.reactions {
        writeln!(
            &mut output,
            "  {} support at {}: force = {:+.4}, moment = {:+.4}",
            reaction.category, reaction.position, reaction.force, reaction.moment
        )
        .expect("writing to string cannot fail");
    }

    // Peak values come from the sampled arrays, not from the closed forms, so their
    // positions are only as fine as the sampling grid.
    output.push_str("\nExtremes:\n");
    for quantity in Quantity::ALL {
        if let Some(extreme) = solution.samples.extreme(quantity) {
            writeln!(
                &mut output,
                "  {quantity}: {:+.4e} at x = {:.4}",
                extreme.value, extreme.position
            )
            .expect("writing to string cannot fail");
        }
    }
    // Bending stress sigma = M y / I over the depth of the section, see
    // https://en.wikipedia.org/wiki/Euler%E2%80%93Bernoulli_beam_theory.
    if let Some(stress) = &solution.stress {
        let peak = stress
            .stress
            .iter()
            .fold(0.0_f64, |peak, value| peak.max(value.abs()));
        writeln!(&mut output, "  |σ|max: {peak:.4e}").expect("writing to string cannot fail");
    }

    output
}
