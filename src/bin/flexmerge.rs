//! flexmerge - merge JSON/YAML documents with path-addressed rules.
//!
//! Documents are merged left to right (later documents win on conflicts).
//! An optional rules file maps dotted path patterns to merge actions; the
//! file can express tag rules and sequence rules, with `match` restricted
//! to `default`/`none` (custom predicates are a library-only feature).

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};

use flex_merge::rules::{
    MatchedAction, MergeAction, MergeOptions, Placement, SequenceMergeAction,
};
use flex_merge::value;

#[derive(Debug, Parser)]
#[command(
    name = "flexmerge",
    version,
    about = "Merge JSON/YAML documents with path-addressed rules"
)]
struct Cli {
    /// Documents to merge, in order. Later documents override earlier ones.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Rules file (YAML or JSON) mapping path patterns to merge actions.
    #[arg(short, long)]
    rules: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum Format {
    Json,
    Yaml,
}

/// A rule as authored in the rules file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RuleSpec {
    Tag(TagSpec),
    Sequence(SequenceSpec),
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TagSpec {
    Merge,
    Replace,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SequenceSpec {
    #[serde(
        default,
        rename = "match",
        deserialize_with = "deserialize_match_mode"
    )]
    match_mode: MatchMode,
    matched: Option<MatchedSpec>,
    #[serde(rename = "notMatched")]
    not_matched: Option<PlacementSpec>,
}

#[derive(Debug, Clone, Copy, Default)]
enum MatchMode {
    #[default]
    Default,
    None,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum MatchedSpec {
    Merge,
    Replace,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum PlacementSpec {
    Prepend,
    Append,
}

/// An explicit `match: null` disables matching, mirroring the library's
/// `ElementMatch::Disabled`; the string forms are accepted as well.
fn deserialize_match_mode<'de, D>(deserializer: D) -> Result<MatchMode, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(MatchMode::None),
        Some(s) if s == "none" => Ok(MatchMode::None),
        Some(s) if s == "default" => Ok(MatchMode::Default),
        Some(other) => Err(serde::de::Error::custom(format!(
            "match must be null, \"none\", or \"default\", got {:?}",
            other
        ))),
    }
}

fn to_merge_action(spec: RuleSpec) -> MergeAction {
    match spec {
        RuleSpec::Tag(TagSpec::Merge) => MergeAction::Merge,
        RuleSpec::Tag(TagSpec::Replace) => MergeAction::Replace,
        RuleSpec::Sequence(seq) => {
            let mut action = SequenceMergeAction::new();
            if matches!(seq.match_mode, MatchMode::None) {
                action = action.no_match();
            }
            if let Some(matched) = seq.matched {
                action = action.matched(match matched {
                    MatchedSpec::Merge => MatchedAction::Merge,
                    MatchedSpec::Replace => MatchedAction::Replace,
                });
            }
            if let Some(placement) = seq.not_matched {
                action = action.not_matched(match placement {
                    PlacementSpec::Prepend => Placement::Prepend,
                    PlacementSpec::Append => Placement::Append,
                });
            }
            MergeAction::Sequence(action)
        }
    }
}

fn load_rules(path: &PathBuf) -> Result<MergeOptions, Box<dyn Error>> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    // Document order is rule precedence, so the map must keep it.
    let specs: IndexMap<String, RuleSpec> = serde_yaml::from_str(&text)
        .map_err(|e| format!("{}: {}", path.display(), e))?;

    let mut options = MergeOptions::new();
    for (pattern, spec) in specs {
        options = options.rule(pattern, to_merge_action(spec));
    }
    Ok(options)
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let options = match &cli.rules {
        Some(path) => load_rules(path)?,
        None => MergeOptions::new(),
    };

    let mut values = Vec::with_capacity(cli.files.len());
    for file in &cli.files {
        let text = fs::read_to_string(file)
            .map_err(|e| format!("{}: {}", file.display(), e))?;
        let parsed = value::from_yaml(&text)
            .map_err(|e| format!("{}: {}", file.display(), e))?;
        values.push(parsed);
    }

    let merged = flex_merge::merge_all_with(values, &options)?
        .ok_or("no documents to merge")?;

    match cli.format {
        Format::Json => println!("{}", value::to_json_pretty(&merged)?),
        Format::Yaml => print!("{}", value::to_yaml(&merged)?),
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("flexmerge: {}", err);
            ExitCode::FAILURE
        }
    }
}
