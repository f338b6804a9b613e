//! Actions map loading.
//!
//! The actions map is YAML where declaration order is meaningful: it is the
//! order categories, actions and arguments appear in the man page. Every
//! mapping is therefore read into an [`OrderedMap`] instead of a hash map.
use anyhow::{Context, Result};
use serde::de::{self, Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::marker::PhantomData;
use std::path::Path;

/// Top-level keys starting with this prefix are internal to the CLI.
pub const PRIVATE_PREFIX: &str = "_";

/// Argument `action` value marking a switch that takes no value.
const NO_VALUE_ACTION: &str = "store_true";

/// Loaded actions map: category name to category, in declaration order.
pub type ActionsMap = OrderedMap<Category>;

/// Mapping that keeps entries in the order they were declared.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(String, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<V> IntoIterator for OrderedMap<V> {
    type Item = (String, V);
    type IntoIter = std::vec::IntoIter<(String, V)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a mapping")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut entries: Vec<(String, V)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(ScalarKey(key)) = access.next_key()? {
            if entries.iter().any(|(name, _)| *name == key) {
                return Err(de::Error::custom(format!("duplicate key {key:?}")));
            }
            let value = access.next_value()?;
            entries.push((key, value));
        }
        Ok(OrderedMap { entries })
    }
}

/// Mapping key read as any YAML scalar and kept as its string form.
struct ScalarKey(String);

impl<'de> Deserialize<'de> for ScalarKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_yaml::Value::deserialize(deserializer)?;
        let key = match value {
            serde_yaml::Value::String(text) => text,
            serde_yaml::Value::Number(number) => number.to_string(),
            serde_yaml::Value::Bool(flag) => flag.to_string(),
            other => {
                return Err(de::Error::custom(format!(
                    "mapping keys must be scalars (got {other:?})"
                )))
            }
        };
        Ok(ScalarKey(key))
    }
}

/// Group of related actions, rendered as one man page section.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub help: String,
    pub actions: OrderedMap<Action>,
}

#[derive(Deserialize)]
struct RawCategory {
    category_help: String,
    actions: OrderedMap<serde_yaml::Value>,
}

impl Category {
    fn from_value(name: &str, value: serde_yaml::Value) -> Result<Self> {
        let raw: RawCategory =
            serde_yaml::from_value(value).with_context(|| format!("category `{name}`"))?;
        let actions = raw
            .actions
            .into_iter()
            .map(|(action_name, action_value)| {
                let action: Action = serde_yaml::from_value(action_value)
                    .with_context(|| format!("action `{name} {action_name}`"))?;
                Ok((action_name, action))
            })
            .collect::<Result<OrderedMap<_>>>()?;
        Ok(Self {
            help: raw.category_help,
            actions,
        })
    }
}

/// Invocable command within a category.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Action {
    #[serde(rename = "action_help")]
    pub help: String,
    /// `None` when the action declares no `arguments` key at all.
    #[serde(default)]
    pub arguments: Option<OrderedMap<Argument>>,
}

/// Named input of an action.
///
/// Names starting with `-` are options; anything else is positional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Option<ArgumentFields>")]
pub struct Argument {
    pub full: Option<String>,
    pub help: Option<String>,
    /// Plain switch: never rendered with a value placeholder.
    pub no_value: bool,
    /// `extra.required` override for option-looking names.
    pub forced_required: bool,
}

/// Argument entry as written in the actions map.
#[derive(Default, Deserialize)]
#[serde(default)]
struct ArgumentFields {
    full: Option<String>,
    help: Option<String>,
    action: Option<String>,
    extra: Option<ArgumentExtra>,
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ArgumentExtra {
    #[serde(deserialize_with = "deserialize_truthy")]
    required: bool,
}

/// YAML 1.1 spellings of false; any other non-empty scalar counts as true.
const FALSE_WORDS: [&str; 9] = [
    "false", "False", "FALSE", "no", "No", "NO", "off", "Off", "OFF",
];

/// Read a flag the way the actions map's YAML 1.1 consumers do: `yes`/`on`
/// are true, `no`/`off`/`~`/empty are false.
fn deserialize_truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = serde_yaml::Value::deserialize(deserializer)?;
    Ok(is_truthy(&value))
}

fn is_truthy(value: &serde_yaml::Value) -> bool {
    use serde_yaml::Value;
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty() && !FALSE_WORDS.contains(&text.as_str()),
        Value::Sequence(items) => !items.is_empty(),
        Value::Mapping(entries) => !entries.is_empty(),
        Value::Tagged(tagged) => is_truthy(&tagged.value),
    }
}

impl From<Option<ArgumentFields>> for Argument {
    fn from(fields: Option<ArgumentFields>) -> Self {
        let fields = fields.unwrap_or_default();
        Self {
            full: fields.full,
            help: fields.help,
            no_value: fields.action.as_deref() == Some(NO_VALUE_ACTION),
            forced_required: fields.extra.is_some_and(|extra| extra.required),
        }
    }
}

pub fn is_option_name(name: &str) -> bool {
    name.starts_with('-')
}

impl Argument {
    /// Positional arguments are always required; options only when forced.
    pub fn is_required(&self, name: &str) -> bool {
        !is_option_name(name) || self.forced_required
    }

    /// Long form shown next to the name, if one is declared.
    pub fn alternate_name(&self) -> Option<&str> {
        self.full.as_deref().filter(|full| !full.is_empty())
    }

    /// Value token shown after an option that takes a value.
    pub fn value_placeholder<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if !is_option_name(name) || self.no_value {
            return None;
        }
        Some(self.full.as_deref().unwrap_or(name).trim_start_matches('-'))
    }
}

/// Split off top-level entries whose key starts with [`PRIVATE_PREFIX`].
///
/// Returns the public entries in their original order and the names of the
/// removed ones.
pub fn strip_private_entries<V>(map: OrderedMap<V>) -> (OrderedMap<V>, Vec<String>) {
    let mut removed = Vec::new();
    let public = map
        .into_iter()
        .filter(|(name, _)| {
            if name.starts_with(PRIVATE_PREFIX) {
                removed.push(name.clone());
                false
            } else {
                true
            }
        })
        .collect();
    (public, removed)
}

/// Read and parse the actions map at `path`, without private entries.
pub fn load_actions_map(path: &Path) -> Result<ActionsMap> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("read actions map {}", path.display()))?;
    parse_actions_map(&text).with_context(|| format!("load actions map {}", path.display()))
}

/// Parse actions map YAML, dropping private entries before typing the rest.
///
/// Private entries are removed first because they do not share the category
/// shape (`_global` carries CLI configuration).
pub fn parse_actions_map(text: &str) -> Result<ActionsMap> {
    let raw: OrderedMap<serde_yaml::Value> =
        serde_yaml::from_str(text).context("parse actions map YAML")?;
    let (public, removed) = strip_private_entries(raw);
    if !removed.is_empty() {
        tracing::debug!(keys = ?removed, "stripped private actions map entries");
    }
    public
        .into_iter()
        .map(|(name, value)| {
            let category = Category::from_value(&name, value)?;
            Ok((name, category))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
_global:
  configuration:
    authenticate: all
  arguments:
    -v:
      full: --version
      action: callback
zeta:
  category_help: Last letter first
  actions:
    second:
      action_help: Declared first
    first:
      action_help: Declared second
      arguments:
        target:
          help: Positional target
        -f:
          full: --force
          action: store_true
        --domain:
          extra:
            required: true
alpha:
  category_help: First letter last
  actions:
    only:
      action_help: Only action
"#;

    #[test]
    fn load_preserves_declaration_order_at_every_level() {
        let map = parse_actions_map(SAMPLE).expect("parse sample");
        assert_eq!(map.keys().collect::<Vec<_>>(), ["zeta", "alpha"]);

        let zeta = map.get("zeta").expect("zeta category");
        assert_eq!(zeta.help, "Last letter first");
        assert_eq!(zeta.actions.keys().collect::<Vec<_>>(), ["second", "first"]);

        let first = zeta.actions.get("first").expect("first action");
        let arguments = first.arguments.as_ref().expect("arguments");
        assert_eq!(
            arguments.keys().collect::<Vec<_>>(),
            ["target", "-f", "--domain"]
        );
    }

    #[test]
    fn private_entries_are_dropped_even_with_foreign_shape() {
        let map = parse_actions_map(SAMPLE).expect("parse sample");
        assert!(map.get("_global").is_none());
        assert!(map.keys().all(|name| !name.starts_with(PRIVATE_PREFIX)));
    }

    #[test]
    fn strip_private_entries_keeps_relative_order_and_reports_removed() {
        let map: OrderedMap<u32> = [("_a", 1), ("b", 2), ("_c", 3), ("d", 4), ("e_", 5)]
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        let (public, removed) = strip_private_entries(map);
        assert_eq!(public.keys().collect::<Vec<_>>(), ["b", "d", "e_"]);
        assert_eq!(removed, ["_a", "_c"]);
    }

    #[test]
    fn argument_fields_are_normalized() {
        let map = parse_actions_map(SAMPLE).expect("parse sample");
        let arguments = map
            .get("zeta")
            .and_then(|category| category.actions.get("first"))
            .and_then(|action| action.arguments.as_ref())
            .expect("arguments");

        let force = arguments.get("-f").expect("-f");
        assert!(force.no_value);
        assert_eq!(force.alternate_name(), Some("--force"));
        assert_eq!(force.value_placeholder("-f"), None);
        assert!(!force.is_required("-f"));

        let domain = arguments.get("--domain").expect("--domain");
        assert!(domain.forced_required);
        assert!(domain.is_required("--domain"));
        assert_eq!(domain.value_placeholder("--domain"), Some("domain"));

        let target = arguments.get("target").expect("target");
        assert!(target.is_required("target"));
        assert_eq!(target.value_placeholder("target"), None);
        assert_eq!(target.help.as_deref(), Some("Positional target"));
    }

    #[test]
    fn action_without_arguments_key_differs_from_empty_arguments() {
        let map = parse_actions_map(
            "cat:\n  category_help: h\n  actions:\n    none:\n      action_help: a\n    empty:\n      action_help: b\n      arguments: {}\n",
        )
        .expect("parse");
        let actions = &map.get("cat").expect("cat").actions;
        assert_eq!(actions.get("none").expect("none").arguments, None);
        assert_eq!(
            actions.get("empty").expect("empty").arguments,
            Some(OrderedMap::new())
        );
    }

    #[test]
    fn bare_argument_and_scalar_keys_are_accepted() {
        let map = parse_actions_map(
            "cat:\n  category_help: h\n  actions:\n    act:\n      action_help: a\n      arguments:\n        name:\n        2:\n          help: numeric\n",
        )
        .expect("parse");
        let arguments = map
            .get("cat")
            .and_then(|category| category.actions.get("act"))
            .and_then(|action| action.arguments.as_ref())
            .expect("arguments");
        assert_eq!(arguments.keys().collect::<Vec<_>>(), ["name", "2"]);
        assert_eq!(arguments.get("name"), Some(&Argument::default()));
    }

    #[test]
    fn missing_category_help_names_the_category() {
        let err = parse_actions_map("user:\n  actions: {}\n").expect_err("missing help");
        let message = format!("{err:#}");
        assert!(message.contains("category `user`"), "{message}");
        assert!(message.contains("category_help"), "{message}");
    }

    #[test]
    fn missing_action_help_names_the_action() {
        let err = parse_actions_map(
            "user:\n  category_help: Users\n  actions:\n    create:\n      arguments: {}\n",
        )
        .expect_err("missing action help");
        let message = format!("{err:#}");
        assert!(message.contains("action `user create`"), "{message}");
    }

    #[test]
    fn extra_required_accepts_yaml_1_1_booleans() {
        let map = parse_actions_map(
            r#"
cat:
  category_help: h
  actions:
    act:
      action_help: a
      arguments:
        --yes:
          extra:
            required: yes
        --on:
          extra:
            required: On
        --no:
          extra:
            required: no
        --off:
          extra:
            required: OFF
        --null:
          extra:
            required:
        --one:
          extra:
            required: 1
"#,
        )
        .expect("parse");
        let arguments = map
            .get("cat")
            .and_then(|category| category.actions.get("act"))
            .and_then(|action| action.arguments.as_ref())
            .expect("arguments");
        let required: Vec<_> = arguments
            .iter()
            .map(|(name, argument)| (name, argument.is_required(name)))
            .collect();
        assert_eq!(
            required,
            [
                ("--yes", true),
                ("--on", true),
                ("--no", false),
                ("--off", false),
                ("--null", false),
                ("--one", true),
            ]
        );
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let result = parse_actions_map(
            "user:\n  category_help: a\n  actions: {}\nuser:\n  category_help: b\n  actions: {}\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn non_mapping_document_is_rejected() {
        assert!(parse_actions_map("- user\n- domain\n").is_err());
    }

    #[test]
    fn only_private_entries_yields_an_empty_map() {
        let map = parse_actions_map("_global:\n  arguments: {}\n").expect("parse");
        assert!(map.is_empty());
    }

    #[test]
    fn load_reports_missing_file_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing.yml");
        let err = load_actions_map(&path).expect_err("missing file");
        assert!(format!("{err:#}").contains("missing.yml"));
    }
}
