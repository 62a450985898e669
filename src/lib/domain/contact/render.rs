//! Email bodies for a submission

/// Escapes the characters that are unsafe inside HTML text and attributes
pub fn escape_html(value: &str) -> String {
    // `&` goes first so the other entities are not escaped twice
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Renders the entries as a standalone HTML document with one table row each
pub fn build_html(entries: &[(String, String)]) -> String {
    let rows: String = entries
        .iter()
        .map(|(key, value)| {
            format!(
                "<tr>\
                 <th style=\"text-align:left;padding:4px 8px;background:#f6f6f6;\">{}</th>\
                 <td style=\"padding:4px 8px;\">{}</td>\
                 </tr>",
                escape_html(key),
                escape_html(value),
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="es">
  <head>
    <meta charset="utf-8" />
    <title>Nuevo mensaje de formulario</title>
  </head>
  <body style="font-family: Arial, sans-serif; background: #ffffff; color: #222;">
    <h2 style="color:#0a6cff;">Nuevo mensaje recibido</h2>
    <table style="border-collapse:collapse; min-width:320px;" cellspacing="0" cellpadding="0">
      {rows}
    </table>
  </body>
</html>"#
    )
}

/// Renders the entries as `key: value` lines
pub fn build_text(entries: &[(String, String)]) -> String {
    entries
        .iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<(String, String)> {
        [
            ("remitente", "a"),
            ("nombre", "Ana"),
            ("correo", "ana@x.com"),
            ("telefono", "123"),
            ("mensaje", "<script>alert(1)</script>"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_escape_html_does_not_double_escape() {
        assert_eq!(escape_html("&lt;"), "&amp;lt;");
    }

    #[test]
    fn test_html_has_one_row_per_entry_and_no_raw_script() {
        let html = build_html(&entries());

        assert_eq!(html.matches("<tr>").count(), 5);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_html_escapes_keys() {
        let html = build_html(&[("<b>".to_string(), "x".to_string())]);

        assert!(html.contains("&lt;b&gt;</th>"));
    }

    #[test]
    fn test_build_text() {
        let text = build_text(&entries()[..2]);

        assert_eq!(text, "remitente: a\nnombre: Ana");
    }

    #[test]
    fn test_formatting_is_deterministic() {
        assert_eq!(build_html(&entries()), build_html(&entries()));
        assert_eq!(build_text(&entries()), build_text(&entries()));
    }
}
