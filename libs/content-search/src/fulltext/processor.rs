use super::parser::parse_rules;
use super::rule::TransformationRule;
use crate::{Error, Result};
use std::path::Path;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

const DEFAULT_RULES: &str = include_str!("../../rules/default.tr");

const BUILTIN_COMMANDS: &[&str] = &["lowercase", "strip_diacritics"];

/// Ordered, rule-driven token normalization.
///
/// Rules accumulate in load order and are never modified afterwards. A
/// command runs as one left-to-right pass: at each position the command's
/// rules are tried in load order and the first match consumes its span.
#[derive(Debug, Clone, Default)]
pub struct TransformationProcessor {
    rules: Vec<TransformationRule>,
}

impl TransformationProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Processor preloaded with the bundled `ascii_lowercase`,
    /// `latin1_lowercase` and `latin1_noaccent` rules.
    pub fn with_default_rules() -> Result<Self> {
        let mut processor = Self::new();
        processor.load_rules("default.tr", DEFAULT_RULES)?;
        Ok(processor)
    }

    /// Parse and append rules. Returns how many were added.
    pub fn load_rules(&mut self, source_name: &str, text: &str) -> Result<usize> {
        let parsed = parse_rules(source_name, text)?;
        let added = parsed.len();
        self.rules.extend(parsed);
        tracing::info!(source = source_name, rules = added, "Loaded transformation rules");
        Ok(added)
    }

    pub fn load_rule_file(&mut self, path: &Path) -> Result<usize> {
        let text = std::fs::read_to_string(path)?;
        self.load_rules(&path.display().to_string(), &text)
    }

    pub fn rules(&self) -> &[TransformationRule] {
        &self.rules
    }

    pub fn has_command(&self, command: &str) -> bool {
        BUILTIN_COMMANDS.contains(&command) || self.rules.iter().any(|r| r.command == command)
    }

    /// Fail on the first command that neither is built in nor has loaded rules.
    pub fn check_commands(&self, commands: &[String]) -> Result<()> {
        match commands.iter().find(|c| !self.has_command(c)) {
            Some(unknown) => Err(Error::UnknownTransformation(unknown.clone())),
            None => Ok(()),
        }
    }

    /// Run `commands` over `input` in order.
    pub fn transform(&self, input: &str, commands: &[String]) -> String {
        commands
            .iter()
            .fold(input.to_string(), |acc, command| self.apply_command(&acc, command))
    }

    pub fn apply_command(&self, input: &str, command: &str) -> String {
        let input = match command {
            "lowercase" => input.chars().flat_map(char::to_lowercase).collect(),
            "strip_diacritics" => input.nfkd().filter(|c| !is_combining_mark(*c)).collect(),
            _ => input.to_string(),
        };

        let rules: Vec<&TransformationRule> =
            self.rules.iter().filter(|r| r.command == command).collect();
        if rules.is_empty() {
            return input;
        }

        let mut out = String::with_capacity(input.len());
        let mut pos = 0;
        while pos < input.len() {
            let rest = &input[pos..];
            match rules.iter().find_map(|r| r.apply_at(rest)) {
                Some((consumed, replacement)) => {
                    out.push_str(&replacement);
                    pos += consumed;
                }
                None => {
                    let Some(c) = rest.chars().next() else {
                        break;
                    };
                    out.push(c);
                    pos += c.len_utf8();
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_rules_fold_case_and_accents() {
        let processor = TransformationProcessor::with_default_rules().unwrap();
        let cmds = commands(&["ascii_lowercase", "latin1_lowercase", "latin1_noaccent"]);
        assert_eq!(processor.transform("Évê", &cmds), "eve");
        assert_eq!(processor.transform("Straße", &cmds), "strasse");
        assert_eq!(processor.transform("ÆSIR", &cmds), "aesir");
    }

    #[test]
    fn builtins_are_always_available() {
        let processor = TransformationProcessor::new();
        assert!(processor.has_command("lowercase"));
        assert_eq!(
            processor.transform("ŁÓDŹ", &commands(&["lowercase", "strip_diacritics"])),
            "łodz"
        );
    }

    #[test]
    fn earlier_rule_preempts_later_rule_for_same_span() {
        let mut processor = TransformationProcessor::new();
        processor
            .load_rules("a.tr", "fold:\n\"ae\" = \"x\"\nU+0061 = \"b\"\n")
            .unwrap();
        // "ae" is consumed whole by the first rule; the lone "a" falls to the second.
        assert_eq!(processor.apply_command("aea", "fold"), "xb");
    }

    #[test]
    fn output_is_not_rescanned_within_a_command() {
        let mut processor = TransformationProcessor::new();
        processor
            .load_rules("a.tr", "swap:\nU+0061 = \"b\"\nU+0062 = \"c\"\n")
            .unwrap();
        assert_eq!(processor.apply_command("ab", "swap"), "bc");
    }

    #[test]
    fn load_rules_is_additive() {
        let mut processor = TransformationProcessor::with_default_rules().unwrap();
        let before = processor.rules().len();
        processor.load_rules("extra.tr", "extra:\n\"ph\" = \"f\"\n").unwrap();
        assert_eq!(processor.rules().len(), before + 1);
        assert!(processor.has_command("ascii_lowercase"));
        assert_eq!(processor.apply_command("phone", "extra"), "fone");
    }

    #[test]
    fn load_rule_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.tr");
        std::fs::write(&path, "custom:\nU+0030 - U+0039 = \"#\"\n").unwrap();

        let mut processor = TransformationProcessor::new();
        assert_eq!(processor.load_rule_file(&path).unwrap(), 1);
        assert_eq!(processor.apply_command("r2d2", "custom"), "r#d#");
    }

    #[test]
    fn unknown_commands_are_reported() {
        let processor = TransformationProcessor::with_default_rules().unwrap();
        assert!(processor.check_commands(&commands(&["ascii_lowercase"])).is_ok());
        let err = processor.check_commands(&commands(&["klingon"])).unwrap_err();
        assert!(matches!(err, Error::UnknownTransformation(c) if c == "klingon"));
    }
}
