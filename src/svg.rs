//! Badge template substitution.
//!
//! Values are written into the text content of elements carrying a known
//! `id` attribute, e.g. `<tspan id="star_data">0</tspan>`.

use crate::error::{GhstatError, Result};
use crate::model::LocTotals;
use crate::util::{thousands, thousands_signed};
use regex::{Captures, Regex};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TemplateIds {
    pub age: String,
    pub repos: String,
    pub contributed: String,
    pub commits: String,
    pub stars: String,
    pub loc: String,
    pub loc_add: String,
    pub loc_del: String,
}

impl Default for TemplateIds {
    fn default() -> Self {
        Self {
            age: "age_data".to_string(),
            repos: "repo_data".to_string(),
            contributed: "contrib_data".to_string(),
            commits: "commit_data".to_string(),
            stars: "star_data".to_string(),
            loc: "loc_data".to_string(),
            loc_add: "loc_add".to_string(),
            loc_del: "loc_del".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BadgeValues {
    pub age: String,
    pub repos: u64,
    pub contributed: u64,
    pub commits: u64,
    pub stars: u64,
    pub loc: LocTotals,
}

impl BadgeValues {
    fn pairs<'a>(&self, ids: &'a TemplateIds) -> Vec<(&'a str, String)> {
        vec![
            (ids.age.as_str(), self.age.clone()),
            (ids.repos.as_str(), thousands(self.repos)),
            (ids.contributed.as_str(), thousands(self.contributed)),
            (ids.commits.as_str(), thousands(self.commits)),
            (ids.stars.as_str(), thousands(self.stars)),
            (ids.loc.as_str(), thousands_signed(self.loc.net())),
            (ids.loc_add.as_str(), format!("{}++", thousands(self.loc.additions))),
            (ids.loc_del.as_str(), format!("{}--", thousands(self.loc.deletions))),
        ]
    }
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn element_pattern(id: &str) -> Result<Regex> {
    let pattern = format!(
        r#"(<[A-Za-z][\w:.-]*(?:\s[^>]*?)?\sid\s*=\s*["']{}["'](?:[^>]*[^/>])?>)[^<]*"#,
        regex::escape(id)
    );
    Regex::new(&pattern).map_err(|e| GhstatError::Template(format!("bad id '{id}': {e}")))
}

/// Replace the text of every element whose id is named in `ids`.
pub fn render(template: &str, values: &BadgeValues, ids: &TemplateIds) -> Result<String> {
    let mut out = template.to_string();
    for (id, value) in values.pairs(ids) {
        let re = element_pattern(id)?;
        if !re.is_match(&out) {
            return Err(GhstatError::Template(format!(
                "no element with id '{id}' that can hold text"
            )));
        }
        let text = escape_text(&value);
        out = re
            .replace_all(&out, |caps: &Captures| format!("{}{}", &caps[1], text))
            .into_owned();
    }
    Ok(out)
}

/// Render `path` in place.
pub fn overwrite(path: &Path, values: &BadgeValues, ids: &TemplateIds) -> Result<()> {
    let template = std::fs::read_to_string(path)?;
    let rendered = render(&template, values, ids)
        .map_err(|e| GhstatError::Template(format!("{}: {e}", path.display())))?;
    std::fs::write(path, rendered)?;
    debug!(path = %path.display(), "template updated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg">
<text><tspan class="key">Uptime</tspan>: <tspan class="value" id="age_data">old</tspan></text>
<text><tspan id="repo_data" class="value">0</tspan> <tspan id="contrib_data">0</tspan></text>
<text><tspan id="commit_data">0</tspan> <tspan id="star_data">0</tspan></text>
<text><tspan id="loc_data">0</tspan> ( <tspan id="loc_add">0++</tspan>, <tspan id='loc_del'>0--</tspan> )</text>
</svg>"#;

    fn values() -> BadgeValues {
        BadgeValues {
            age: "22 years, 2 months, 5 days".to_string(),
            repos: 31,
            contributed: 1045,
            commits: 2300,
            stars: 12,
            loc: LocTotals::new(1_234_567, 234_567),
        }
    }

    #[test]
    fn fills_every_field() {
        let out = render(TEMPLATE, &values(), &TemplateIds::default()).unwrap();
        assert!(out.contains(r#"id="age_data">22 years, 2 months, 5 days</tspan>"#));
        assert!(out.contains(r#"class="value">31</tspan>"#));
        assert!(out.contains(r#"id="contrib_data">1,045</tspan>"#));
        assert!(out.contains(r#"id="commit_data">2,300</tspan>"#));
        assert!(out.contains(r#"id="loc_data">1,000,000</tspan>"#));
        assert!(out.contains(r#"id="loc_add">1,234,567++</tspan>"#));
        assert!(out.contains(r#"id='loc_del'>234,567--</tspan>"#));
        assert!(out.contains(r#"<tspan class="key">Uptime</tspan>"#));
    }

    #[test]
    fn rendering_twice_is_stable() {
        let ids = TemplateIds::default();
        let once = render(TEMPLATE, &values(), &ids).unwrap();
        let twice = render(&once, &values(), &ids).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn missing_id_is_an_error() {
        let err = render("<svg><tspan id=\"age_data\">x</tspan></svg>", &values(), &TemplateIds::default())
            .unwrap_err();
        assert!(err.to_string().contains("repo_data"));
    }

    #[test]
    fn similar_ids_are_not_confused() {
        let ids = TemplateIds::default();
        let template = TEMPLATE.replace(
            "<svg xmlns=\"http://www.w3.org/2000/svg\">",
            "<svg xmlns=\"http://www.w3.org/2000/svg\"><tspan data-id=\"star_data\">keep</tspan>",
        );
        let out = render(&template, &values(), &ids).unwrap();
        assert!(out.contains(r#"data-id="star_data">keep</tspan>"#));
    }

    #[test]
    fn self_closing_target_is_an_error() {
        let template = TEMPLATE.replace(
            r#"<tspan id="star_data">0</tspan>"#,
            r#"<tspan id="star_data"/>"#,
        );
        let err = render(&template, &values(), &TemplateIds::default()).unwrap_err();
        assert!(err.to_string().contains("star_data"));

        let spaced = TEMPLATE.replace(
            r#"<tspan id="star_data">0</tspan>"#,
            r#"<tspan id="star_data" class="v" />"#,
        );
        assert!(render(&spaced, &values(), &TemplateIds::default()).is_err());
    }

    #[test]
    fn text_is_escaped() {
        let mut v = values();
        v.age = "<1 day & counting>".to_string();
        let out = render(TEMPLATE, &v, &TemplateIds::default()).unwrap();
        assert!(out.contains("&lt;1 day &amp; counting&gt;"));
    }

    #[test]
    fn overwrite_rewrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dark_mode.svg");
        std::fs::write(&path, TEMPLATE).unwrap();
        overwrite(&path, &values(), &TemplateIds::default()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains(r#"id="star_data">12</tspan>"#));
    }
}
