use super::{ServiceTrace, StepTrace};

/// Formats evaluation traces into human-readable text.
pub struct TraceFormatter;

impl TraceFormatter {
    /// Renders a service trace, one step per line, sub-pipelines indented.
    ///
    /// ```text
    /// Вода
    ///   get_volume(Вода): 0 -> 13.5
    ///   multiply_by_param(rate): 13.5 -> 24.1083
    ///   = 24.11
    /// ```
    pub fn format_trace(trace: &ServiceTrace) -> String {
        let mut out = format!("{}\n", trace.service);
        Self::format_steps(&trace.steps, 1, &mut out);
        out.push_str(&format!("  = {:.2}", trace.cost));
        out
    }

    fn format_steps(steps: &[StepTrace], depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        for step in steps {
            out.push_str(&format!(
                "{}{}: {} -> {}\n",
                indent,
                step.step,
                Self::format_value(step.before),
                Self::format_value(step.after)
            ));
            for (index, branch) in step.branches.iter().enumerate() {
                out.push_str(&format!("{}  [{}]\n", indent, index + 1));
                Self::format_steps(branch, depth + 2, out);
            }
        }
    }

    /// Whole numbers without decimals, everything else to at most 4 places.
    fn format_value(value: f64) -> String {
        if value.fract() == 0.0 {
            format!("{}", value as i64)
        } else {
            let text = format!("{:.4}", value);
            text.trim_end_matches('0').trim_end_matches('.').to_string()
        }
    }
}
