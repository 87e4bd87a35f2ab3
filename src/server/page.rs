//! HTML for the lookup form

use crate::lookup::{AlumniMatch, ProficiencyRank};

/// Escape text for use in HTML element content and quoted attributes
pub fn escape_html(text: &str) -> String {
    html_escape::encode_quoted_attribute(text).into_owned()
}

fn rank_class(rank: ProficiencyRank) -> &'static str {
    match rank {
        ProficiencyRank::Expert => "expert",
        ProficiencyRank::Intermediate => "intermediate",
        ProficiencyRank::Other => "other",
    }
}

fn render_results(current_skill: &str, matches: &[AlumniMatch]) -> String {
    if matches.is_empty() {
        return format!(
            "<p class=\"empty\">No alumni found with skill &quot;{}&quot;.</p>\n",
            escape_html(current_skill)
        );
    }

    let mut html = format!(
        "<h2>Alumni with &quot;{}&quot;</h2>\n<table>\n<tr><th>First name</th><th>Last name</th><th>Proficiency</th><th>Skill</th></tr>\n",
        escape_html(current_skill)
    );
    for m in matches {
        html.push_str(&format!(
            "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            rank_class(m.rank()),
            escape_html(&m.first_name),
            escape_html(&m.last_name),
            escape_html(m.proficiency_level.as_deref().unwrap_or("")),
            escape_html(&m.skill_name),
        ));
    }
    html.push_str("</table>\n");
    html
}

/// Full page: search form, skill hints, and results when a search was made
pub fn render_page(current_skill: &str, skills: &[String], matches: Option<&[AlumniMatch]>) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Alumni Skill Matcher</title>\n</head>\n<body>\n<h1>Alumni Skill Matcher</h1>\n",
    );

    html.push_str(&format!(
        "<form method=\"post\" action=\"/\">\n<input name=\"skill\" list=\"skills\" value=\"{}\" placeholder=\"Skill name\">\n<button type=\"submit\">Search</button>\n</form>\n",
        escape_html(current_skill)
    ));

    html.push_str("<datalist id=\"skills\">\n");
    for skill in skills {
        html.push_str(&format!("<option value=\"{}\">\n", escape_html(skill)));
    }
    html.push_str("</datalist>\n");

    if let Some(matches) = matches {
        html.push_str(&render_results(current_skill, matches));
    }

    html.push_str("</body>\n</html>\n");
    html
}
