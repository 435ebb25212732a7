//! Metadata synthesizer: fills title/description templates and builds the
//! keyword list from a `DescriptorSet`.
//!
//! Everything here is a pure function of the descriptor set and the
//! `MetadataConfig`; the same input always yields the same record.

use crate::config::MetadataConfig;
use crate::types::{dedup_keep_first, title_case, ColorLabel, DescriptorSet, MetadataRecord};

/// Hard upper bound on keywords per image imposed by stock agencies.
pub const MAX_KEYWORDS: usize = 50;

const CLOSING_CLAUSE: &str =
    "Suitable for websites, apps, presentations, banners, and corporate branding.";

/// Builds `MetadataRecord`s from descriptor sets.
pub struct MetadataSynthesizer {
    config: MetadataConfig,
}

impl MetadataSynthesizer {
    pub fn new(config: MetadataConfig) -> Self {
        Self { config }
    }

    pub fn synthesize(&self, set: &DescriptorSet) -> MetadataRecord {
        let title_candidates = self.title_candidates(set);
        MetadataRecord {
            title: title_candidates.first().cloned().unwrap_or_default(),
            title_candidates,
            description: self.description(set),
            keywords: self.keywords(set),
        }
    }

    /// Ordered title alternatives; the first is canonical.
    pub fn title_candidates(&self, set: &DescriptorSet) -> Vec<String> {
        let color = set.color.capitalized();
        let shape = set.shapes.first().map(|s| title_case(s)).unwrap_or_default();
        let style = set.styles.first().map(|s| title_case(s)).unwrap_or_default();

        // "Abstract Abstract ..." reads badly; drop the sentinel next to the
        // literal word.
        let color_beside_abstract = if set.color == ColorLabel::Abstract {
            ""
        } else {
            color.as_str()
        };

        let mut modern = vec!["Modern", color.as_str(), shape.as_str(), "Background"];
        if !style.is_empty() {
            modern.extend(["with", style.as_str(), "Design"]);
        }

        vec![
            join_words(&[
                "Abstract",
                color_beside_abstract,
                shape.as_str(),
                "Technology",
                "Background",
            ]),
            join_words(&modern),
            join_words(&[color_beside_abstract, shape.as_str(), "Abstract", "Wallpaper"]),
        ]
    }

    /// One templated description paragraph. Absent slots drop their clause.
    pub fn description(&self, set: &DescriptorSet) -> String {
        let mut text = String::from("Modern abstract background");

        let shapes = lowercase_slots(set.shapes.iter().take(2));
        if !shapes.is_empty() {
            text.push_str(" featuring ");
            text.push_str(&shapes.join(" and "));
        }
        if set.color != ColorLabel::Abstract {
            text.push_str(&format!(" in {} tones", set.color));
        }
        let styles = lowercase_slots(set.styles.iter().take(2));
        if !styles.is_empty() {
            text.push_str(&format!(" with a {} look", styles.join(" and ")));
        }
        let best_use = lowercase_slots(set.best_use.iter());
        if !best_use.is_empty() {
            text.push_str(", ideal for ");
            text.push_str(&join_list(&best_use));
        }

        format!("{text}. {CLOSING_CLAUSE}")
    }

    /// The keyword candidates in their fixed order, before dedup and cap.
    pub fn keyword_candidates(&self, set: &DescriptorSet) -> Vec<String> {
        let color = set.color.as_str();
        self.config
            .base_keywords
            .iter()
            .cloned()
            .chain([color.to_string(), format!("{color} background")])
            .chain(set.shapes.iter().cloned())
            .chain(set.styles.iter().cloned())
            .chain(set.best_use.iter().cloned())
            .chain(set.secondary_colors.iter().map(|c| c.as_str().to_string()))
            .collect()
    }

    /// Deduplicated keywords truncated to the configured cap.
    pub fn keywords(&self, set: &DescriptorSet) -> Vec<String> {
        let mut keywords = dedup_keep_first(self.keyword_candidates(set));
        keywords.truncate(self.config.keyword_cap.min(MAX_KEYWORDS));
        keywords
    }
}

fn join_words(words: &[&str]) -> String {
    words
        .iter()
        .map(|w| w.trim())
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn lowercase_slots<'a>(items: impl Iterator<Item = &'a String>) -> Vec<String> {
    items
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// "a", "a and b", "a, b, and c".
fn join_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn synthesizer() -> MetadataSynthesizer {
        MetadataSynthesizer::new(MetadataConfig::default())
    }

    fn blue_waves() -> DescriptorSet {
        DescriptorSet {
            color: ColorLabel::Blue,
            secondary_colors: vec![ColorLabel::Purple],
            shapes: vec!["waves".into()],
            styles: vec!["fluid".into(), "flowing".into(), "clean".into()],
            best_use: vec!["technology concepts".into(), "digital innovation".into()],
        }
    }

    #[test]
    fn test_title_candidates() {
        let titles = synthesizer().title_candidates(&blue_waves());
        assert_eq!(
            titles,
            vec![
                "Abstract Blue Waves Technology Background",
                "Modern Blue Waves Background with Fluid Design",
                "Blue Waves Abstract Wallpaper",
            ]
        );
    }

    #[test]
    fn test_title_collapses_missing_slots() {
        let set = DescriptorSet::default();
        let titles = synthesizer().title_candidates(&set);
        assert_eq!(titles[0], "Abstract Technology Background");
        assert_eq!(titles[1], "Modern Abstract Background");
        assert_eq!(titles[2], "Abstract Wallpaper");
        for title in &titles {
            assert!(!title.contains("  "));
            assert!(!title.contains("Abstract Abstract"));
        }
    }

    #[test]
    fn test_description_template() {
        let description = synthesizer().description(&blue_waves());
        assert_eq!(
            description,
            "Modern abstract background featuring waves in blue tones with a fluid and \
             flowing look, ideal for technology concepts and digital innovation. \
             Suitable for websites, apps, presentations, banners, and corporate branding."
        );
    }

    #[test]
    fn test_description_joins_two_shapes_and_lists_best_use() {
        let set = DescriptorSet {
            color: ColorLabel::Dark,
            shapes: vec!["particles".into(), "Mesh".into(), "lines".into()],
            best_use: vec!["apps".into(), "banners".into(), "slides".into()],
            ..DescriptorSet::default()
        };
        let description = synthesizer().description(&set);
        assert!(description.starts_with(
            "Modern abstract background featuring particles and mesh in dark tones, \
             ideal for apps, banners, and slides."
        ));
        assert!(!description.contains("lines"));
    }

    #[test]
    fn test_description_without_signals() {
        let description = synthesizer().description(&DescriptorSet::default());
        assert_eq!(description, format!("Modern abstract background. {CLOSING_CLAUSE}"));
    }

    #[test]
    fn test_keyword_order() {
        let keywords = synthesizer().keywords(&blue_waves());
        let position = |k: &str| keywords.iter().position(|x| x == k).unwrap();
        assert_eq!(keywords[0], "abstract");
        assert!(position("blue") < position("blue background"));
        assert!(position("blue background") < position("waves"));
        assert!(position("waves") < position("fluid"));
        assert!(position("clean") < position("technology concepts"));
        assert!(position("digital innovation") < position("purple"));
    }

    #[test]
    fn test_keywords_unique_case_insensitive() {
        let set = DescriptorSet {
            shapes: vec!["Abstract".into(), "WAVES".into(), "waves".into()],
            styles: vec!["  ".into(), "Modern".into()],
            ..blue_waves()
        };
        let keywords = synthesizer().keywords(&set);
        let lowered: HashSet<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
        assert_eq!(lowered.len(), keywords.len());
        assert!(keywords.iter().all(|k| !k.trim().is_empty()));
        assert!(keywords.len() <= MAX_KEYWORDS);
    }

    #[test]
    fn test_truncation_law() {
        let config = MetadataConfig {
            base_keywords: (0..70).map(|i| format!("term {i}")).collect(),
            ..MetadataConfig::default()
        };
        let synth = MetadataSynthesizer::new(config);
        let set = blue_waves();
        let keywords = synth.keywords(&set);
        let expected: Vec<String> = dedup_keep_first(synth.keyword_candidates(&set))
            .into_iter()
            .take(MAX_KEYWORDS)
            .collect();
        assert_eq!(keywords.len(), MAX_KEYWORDS);
        assert_eq!(keywords, expected);
        assert!(!keywords.contains(&"blue".to_string()));
    }

    #[test]
    fn test_keyword_cap_respected() {
        let config = MetadataConfig {
            keyword_cap: 5,
            ..MetadataConfig::default()
        };
        let keywords = MetadataSynthesizer::new(config).keywords(&blue_waves());
        assert_eq!(
            keywords,
            vec!["abstract", "background", "abstract background", "technology", "modern"]
        );
    }

    #[test]
    fn test_synthesize_is_idempotent() {
        let synth = synthesizer();
        let set = blue_waves();
        let first = synth.synthesize(&set);
        assert_eq!(first, synth.synthesize(&set));
        assert_eq!(first.title, first.title_candidates[0]);
        assert!(!first.description.is_empty());
    }

    #[test]
    fn test_join_list() {
        assert_eq!(join_list(&[]), "");
        assert_eq!(join_list(&["a".into()]), "a");
        assert_eq!(join_list(&["a".into(), "b".into()]), "a and b");
        assert_eq!(join_list(&["a".into(), "b".into(), "c".into()]), "a, b, and c");
    }
}
