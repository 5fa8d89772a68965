//! Prometheus text exposition format (version 0.0.4).

use crate::MetricFamily;

/// Serializes metric families into the Prometheus text format, preserving
/// family and sample order.
pub fn encode_text(families: &[MetricFamily]) -> String {
    let mut out = String::new();

    for family in families {
        out.push_str(&format!(
            "# HELP {} {}\n",
            family.name,
            escape_help(&family.help)
        ));
        out.push_str(&format!("# TYPE {} gauge\n", family.name));

        for sample in &family.samples {
            out.push_str(&family.name);
            if !family.label_names.is_empty() {
                out.push('{');
                for (i, (name, value)) in family
                    .label_names
                    .iter()
                    .zip(&sample.label_values)
                    .enumerate()
                {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_label_value(value));
                    out.push('"');
                }
                out.push('}');
            }
            out.push(' ');
            out.push_str(&format_value(sample.value));
            out.push('\n');
        }
    }

    out
}

/// HELP text escaping: backslash and line feed.
fn escape_help(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\n', "\\n")
}

/// Label value escaping: backslash, double quote, line feed.
fn escape_label_value(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

fn format_value(value: f64) -> String {
    if value == f64::INFINITY {
        "+Inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-Inf".to_string()
    } else if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value}")
    }
}
