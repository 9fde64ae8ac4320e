//! HTML building blocks: escaping, Markdown comments, and the page shell.

use pulldown_cmark::{html, Options, Parser};

/// Shared stylesheet for the generated pages.
const STYLE: &str = r#"
* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; line-height: 1.6; color: #333; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); min-height: 100vh; padding: 20px; }
.container { max-width: 1400px; margin: 0 auto; background: white; border-radius: 15px; overflow: hidden; box-shadow: 0 20px 40px rgba(0,0,0,0.1); }
.header { background: linear-gradient(135deg, #2c3e50 0%, #3498db 100%); color: white; padding: 40px; text-align: center; }
.header h1 { font-size: 2.5em; font-weight: 300; margin-bottom: 10px; }
.nav { background: #34495e; padding: 15px 40px; position: sticky; top: 0; }
.nav ul { list-style: none; display: flex; gap: 30px; flex-wrap: wrap; }
.nav a { color: white; text-decoration: none; }
.content { padding: 40px; }
.section { margin-bottom: 50px; }
.section h2 { color: #2c3e50; border-bottom: 3px solid #3498db; padding-bottom: 10px; margin-bottom: 25px; }
.stats-grid, .file-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(220px, 1fr)); gap: 20px; }
.stat-card, .file-card { background: #f8f9fa; border: 1px solid #e9ecef; border-radius: 10px; padding: 20px; text-decoration: none; color: inherit; }
.stat-number { font-size: 2.2em; color: #3498db; }
.item { border-left: 4px solid #3498db; background: #fbfcfd; padding: 20px; margin-bottom: 20px; border-radius: 0 8px 8px 0; }
.item h3 { color: #2c3e50; }
.uri { font-family: monospace; font-size: 0.9em; color: #7f8c8d; word-break: break-all; }
.relations dt { font-weight: 600; margin-top: 8px; }
.file-type { display: inline-block; background: #3498db; color: white; padding: 4px 8px; border-radius: 4px; font-size: 0.8em; }
.footer { text-align: center; padding: 20px; color: #7f8c8d; }
"#;

/// Converts Markdown to HTML using pulldown-cmark.
#[must_use]
pub fn markdown_to_html(markdown: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_FOOTNOTES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(markdown, opts);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_output
}

/// Renders an ontology comment. Raw HTML in the comment is escaped first,
/// so only Markdown formatting reaches the page.
#[must_use]
pub fn render_comment(comment: &str) -> String {
    markdown_to_html(&escape_html(comment))
}

/// Wraps `body_html` in the standard page shell.
#[must_use]
pub fn render_page(title: &str, subtitle: &str, body_html: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{STYLE}</style>
</head>
<body>
<div class="container">
<div class="header">
<h1>{title}</h1>
<p>{subtitle}</p>
</div>
{body_html}
</div>
</body>
</html>
"#,
        title = escape_html(title),
        subtitle = escape_html(subtitle),
    )
}

/// Escapes HTML special characters in a string.
#[must_use]
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
    }

    #[test]
    fn comment_markdown_rendered_but_html_neutralized() {
        let html = render_comment("a **bold** <script>x</script>");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn page_title_is_escaped() {
        let page = render_page("A & B", "sub", "<p>body</p>");
        assert!(page.contains("<title>A &amp; B</title>"));
        assert!(page.contains("<p>body</p>"));
    }
}
