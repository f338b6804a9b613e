use crate::actionsmap::{Argument, OrderedMap};

/// One argument as it appears in a usage line and a `.TP` entry.
pub(super) struct ArgumentEntry<'a> {
    pub(super) name: &'a str,
    pub(super) alternate: Option<&'a str>,
    pub(super) value: Option<&'a str>,
    pub(super) required: bool,
    pub(super) help: &'a str,
}

impl<'a> ArgumentEntry<'a> {
    fn new(name: &'a str, argument: &'a Argument) -> Self {
        Self {
            name,
            alternate: argument.alternate_name(),
            value: argument.value_placeholder(name),
            required: argument.is_required(name),
            help: argument.help.as_deref().unwrap_or(""),
        }
    }
}

pub(super) fn argument_entries(arguments: Option<&OrderedMap<Argument>>) -> Vec<ArgumentEntry<'_>> {
    arguments
        .map(|arguments| {
            arguments
                .iter()
                .map(|(name, argument)| ArgumentEntry::new(name, argument))
                .collect()
        })
        .unwrap_or_default()
}
