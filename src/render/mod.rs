//! Side-by-side HTML comparison card.

use crate::movie::MovieRecord;

const STYLE: &str = r#"body { font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif; padding: 20px; background: #f4f4f9; }
.battle-card { display: flex; gap: 20px; max-width: 700px; margin: 0 auto; background: white; padding: 25px; border-radius: 16px; box-shadow: 0 10px 30px rgba(0,0,0,0.1); }
.movie { flex: 1; display: flex; flex-direction: column; align-items: center; text-align: center; }
.poster { width: 150px; height: 225px; border-radius: 8px; box-shadow: 0 4px 10px rgba(0,0,0,0.2); object-fit: cover; margin-bottom: 15px; }
.vs { align-self: center; font-weight: 900; font-size: 32px; color: #ddd; margin: 0 10px; font-style: italic; }
.title { font-size: 1.2em; font-weight: 800; margin-bottom: 5px; color: #1a1a1a; height: 3em; display: flex; align-items: center; justify-content: center; }
.year { color: #888; font-size: 0.9em; margin-bottom: 15px; }
.stat-row { width: 100%; margin-top: 15px; text-align: left; }
.label { font-size: 0.75em; text-transform: uppercase; color: #888; letter-spacing: 0.5px; font-weight: 600; margin-bottom: 4px; }
.value { font-size: 1.3em; font-weight: 700; color: #333; }
.value.accent { color: var(--accent); }
.bar-bg { background: #eee; height: 8px; border-radius: 4px; width: 100%; margin-top: 6px; overflow: hidden; }
.bar { height: 100%; background: var(--accent); transition: width 0.5s ease-out; border-radius: 4px; }"#;

/// Render a self-contained HTML comparison card for two movies.
///
/// Output depends only on the two records. Provider text is embedded as-is.
pub fn render(left: &MovieRecord, right: &MovieRecord) -> String {
    let mut lines = Vec::new();

    lines.push("<!DOCTYPE html>".to_string());
    lines.push("<html>".to_string());
    lines.push("<head>".to_string());
    lines.push("<meta charset=\"utf-8\">".to_string());
    lines.push("<style>".to_string());
    lines.extend(STYLE.lines().map(str::to_string));
    lines.push("</style>".to_string());
    lines.push("</head>".to_string());
    lines.push("<body>".to_string());
    lines.push("<div class=\"battle-card\">".to_string());

    render_movie(&mut lines, left);
    lines.push("<div class=\"vs\">VS</div>".to_string());
    render_movie(&mut lines, right);

    lines.push("</div>".to_string());
    lines.push("</body>".to_string());
    lines.push("</html>".to_string());

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn render_movie(lines: &mut Vec<String>, movie: &MovieRecord) {
    // The accent is declared once per column; value text and bar read it.
    lines.push(format!(
        "<div class=\"movie\" style=\"--accent: {}\">",
        movie.accent_color
    ));
    lines.push(format!(
        "<img src=\"{}\" class=\"poster\" alt=\"Poster\">",
        movie.poster_url
    ));
    lines.push(format!("<div class=\"title\">{}</div>", movie.title));
    lines.push(format!("<div class=\"year\">({})</div>", movie.year));

    lines.push("<div class=\"stat-row\">".to_string());
    lines.push("<div class=\"label\">Rotten Tomatoes</div>".to_string());
    lines.push(format!(
        "<div class=\"value accent\">{}</div>",
        movie.rotten_tomatoes_display
    ));
    lines.push(format!(
        "<div class=\"bar-bg\"><div class=\"bar\" style=\"width: {}%\"></div></div>",
        movie.rotten_tomatoes_value
    ));
    lines.push("</div>".to_string());

    lines.push("<div class=\"stat-row\">".to_string());
    lines.push("<div class=\"label\">Box Office</div>".to_string());
    lines.push(format!(
        "<div class=\"value\">{}</div>",
        movie.box_office_display
    ));
    lines.push("</div>".to_string());

    lines.push("</div>".to_string());
}
