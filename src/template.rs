use std::fs;
use thiserror::Error;
use crate::fields::DisplayFields;

#[derive(Error, Debug)]
#[error("error rendering template: {0}")]
pub struct TemplateError(pub String);

impl From<std::io::Error> for TemplateError {
    fn from(e: std::io::Error) -> TemplateError {
        TemplateError(e.to_string())
    }
}

/// Reads the HTML template, substitutes every {{KEY}} placeholder whose
/// key is present in the fields, and writes the document to the output
/// path, overwriting any previous output
///
/// # Arguments
///
/// * 'template_path' - path to the static HTML template
/// * 'output_path' - path the rendered document is written to
/// * 'fields' - the display fields to substitute
pub fn render_document(template_path: &str, output_path: &str, fields: &DisplayFields)
                       -> Result<(), TemplateError> {

    let template = fs::read_to_string(template_path)
        .map_err(|e| TemplateError(format!("template {}: {}", template_path, e)))?;

    let html = substitute(&template, fields);

    fs::write(output_path, html)
        .map_err(|e| TemplateError(format!("output {}: {}", output_path, e)))?;

    Ok(())
}

/// Replaces every literal {{KEY}} occurrence with its field value in a
/// single left-to-right pass.
///
/// Placeholders without a matching key stay verbatim, keys without a
/// placeholder are ignored, and substituted values are never re-scanned.
///
/// # Arguments
///
/// * 'template' - the template text
/// * 'fields' - the display fields to substitute
pub fn substitute(template: &str, fields: &DisplayFields) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        match after.find("}}") {
            Some(end) => {
                let key = &after[..end];
                match fields.get(key) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + end + 4]),
                }
                rest = &after[end + 2..];
            }
            None => {
                // unterminated placeholder, keep the tail as-is
                out.push_str(&rest[start..]);
                return out;
            }
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> DisplayFields {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn replaces_every_occurrence_of_a_placeholder() {
        let fields = fields(&[("TEMP", "16")]);

        let out = substitute("now {{TEMP}}, still {{TEMP}}", &fields);

        assert_eq!(out, "now 16, still 16");
    }

    #[test]
    fn unmatched_placeholder_stays_verbatim() {
        let fields = fields(&[("TEMP", "16")]);

        let out = substitute("{{TEMP}} and {{MISSING}}", &fields);

        assert_eq!(out, "16 and {{MISSING}}");
    }

    #[test]
    fn unused_key_changes_nothing() {
        let fields = fields(&[("TEMP", "16"), ("UNUSED", "x")]);

        let out = substitute("just {{TEMP}}", &fields);

        assert_eq!(out, "just 16");
    }

    #[test]
    fn substituted_values_are_not_reprocessed() {
        let fields = fields(&[("A", "{{B}}"), ("B", "nope")]);

        let out = substitute("{{A}}", &fields);

        assert_eq!(out, "{{B}}");
    }

    #[test]
    fn unterminated_placeholder_keeps_the_tail() {
        let fields = fields(&[("TEMP", "16")]);

        let out = substitute("{{TEMP}} then {{OOPS", &fields);

        assert_eq!(out, "16 then {{OOPS");
    }

    #[test]
    fn renders_and_overwrites_the_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("template.html");
        let output_path = dir.path().join("output.html");
        std::fs::write(&template_path, "<p>{{TEMP}}&deg;</p>").unwrap();
        std::fs::write(&output_path, "stale").unwrap();

        render_document(
            template_path.to_str().unwrap(),
            output_path.to_str().unwrap(),
            &fields(&[("TEMP", "16")]),
        ).unwrap();

        assert_eq!(std::fs::read_to_string(&output_path).unwrap(), "<p>16&deg;</p>");
    }

    #[test]
    fn missing_template_is_an_error() {
        let err = render_document("/nonexistent/template.html", "/tmp/out.html", &fields(&[]))
            .unwrap_err();

        assert!(err.to_string().contains("/nonexistent/template.html"));
    }
}
