use super::model::{argument_entries, ArgumentEntry};
use super::RenderDate;
use crate::actionsmap::{Action, ActionsMap, Category};

const SYNOPSIS_LINE: &str = r"yunohost \fI\,CATEGORY\/\fR \fI\,COMMAND\/\fR [\fI\,SUBCOMMAND\/\fR] [\fI\,ARGUMENTS\/\fR]... [\fI\,OPTIONS\/\fR]...";

// Global flags are handled by the CLI itself, not declared per category.
const GLOBAL_USAGE: &str = r"\&...
[\-h|\-\-help] [\-\-no\-cache] [\-\-output\-as {json,plain,none}] [\-\-debug]
[\-\-quiet] [\-\-timeout ==SUPPRESS==] [\-\-admin\-password PASSWORD]
[\-v|\-\-version]

";

const OPTIONAL_ARGUMENTS: &str = r#".SS "optional arguments:"
.TP
\fB\-h\fR, \fB\-\-help\fR
show this help message and exit

"#;

const GLOBAL_ARGUMENTS: &str = r#".SS "global arguments:"
.TP
\fB\-\-no\-cache\fR
Don't use actions map cache
.TP
\fB\-\-output\-as\fR {json,plain,none}
Output result in another format
.TP
\fB\-\-debug\fR
Log and print debug messages
.TP
\fB\-\-quiet\fR
Don't produce any output
.TP
\fB\-\-timeout\fR SECONDS
Number of seconds before this command will timeout
because it can't acquire the lock (meaning that
another command is currently running), by default
there is no timeout and the command will wait until it
can get the lock
.TP
\fB\-\-admin\-password\fR PASSWORD
The admin password to use to authenticate
.TP
\fB\-v\fR, \fB\-\-version\fR
Display YunoHost packages versions
"#;

pub(super) fn append_header(out: &mut String, date: &RenderDate) {
    out.push_str(&format!(
        ".TH YunoHost \"1\" \"{} {}\" \"YunoHost Collectif\"\n",
        date.month, date.year
    ));
}

pub(super) fn append_name_section(out: &mut String) {
    out.push_str(".SH NAME\n");
    out.push_str("YunoHost \\- yunohost server administration command\n\n");
}

pub(super) fn append_synopsis_section(out: &mut String) {
    out.push_str(".SH SYNOPSIS\n");
    out.push_str(SYNOPSIS_LINE);
    out.push_str("\n\n\n");
}

pub(super) fn append_description_section(out: &mut String, map: &ActionsMap) {
    let categories = choice_set(map.keys());
    out.push_str(".SH DESCRIPTION\n");
    out.push_str("usage: yunohost\n");
    out.push_str(&format!("{categories}\n"));
    out.push_str(GLOBAL_USAGE);
    out.push_str(OPTIONAL_ARGUMENTS);
    out.push_str(".SS \"categories:\"\n.IP\n");
    out.push_str(&format!("{categories}\n"));
    for (name, category) in map.iter() {
        out.push_str(&format!("\n.TP\n{name}\n{}\n", category.help));
    }
    out.push_str("\n\n");
    out.push_str(GLOBAL_ARGUMENTS);
    out.push_str("\n\n");
}

pub(super) fn append_category_section(out: &mut String, name: &str, category: &Category) {
    out.push_str(&format!("\n.SH YUNOHOST {}\n", name.to_uppercase()));
    out.push_str(&format!(
        "usage: yunohost {name} {}\n",
        choice_set(category.actions.keys())
    ));
    out.push_str("\\&...\n.SS \"description:\"\n.IP\n");
    out.push_str(&format!("{}\n\n\n", category.help));
    for (action_name, action) in category.actions.iter() {
        append_action_subsection(out, name, action_name, action);
    }
    out.push('\n');
}

fn append_action_subsection(out: &mut String, category: &str, name: &str, action: &Action) {
    let entries = argument_entries(action.arguments.as_ref());
    out.push_str(&format!(
        "\n.SS \"yunohost {category} {name} {}\"\n\n\n",
        usage_arguments(&entries)
    ));
    out.push_str(&format!("{}\n\n\n", action.help));
    // An explicit empty `arguments` mapping still opens the detail block.
    if action.arguments.is_some() {
        out.push('\n');
        for entry in &entries {
            out.push_str(&format!("\n.TP\n{}\n{}\n", argument_term(entry), entry.help));
        }
        out.push_str("\n\n");
    }
    out.push('\n');
}

/// Arguments part of a `.SS` usage line, each followed by one space.
fn usage_arguments(entries: &[ArgumentEntry<'_>]) -> String {
    let mut line = String::new();
    for entry in entries {
        if !entry.required {
            line.push('[');
        }
        line.push_str(&format!("\\fI\\,{}\\/\\fR", entry.name));
        if let Some(alternate) = entry.alternate {
            line.push_str(&format!("|\\fI\\,{alternate}\\fR"));
        }
        if let Some(value) = entry.value {
            line.push(' ');
            line.push_str(value);
        }
        if !entry.required {
            line.push(']');
        }
        line.push(' ');
    }
    line
}

fn argument_term(entry: &ArgumentEntry<'_>) -> String {
    let mut term = format!("\\fB{}\\fR", entry.name);
    if let Some(alternate) = entry.alternate {
        term.push_str(&format!(", \\fB{alternate}\\fR"));
    }
    if let Some(value) = entry.value {
        term.push_str(&format!(" \\fI\\,{value}\\fR"));
    }
    term
}

fn choice_set<'a>(names: impl Iterator<Item = &'a str>) -> String {
    format!("{{{}}}", names.collect::<Vec<_>>().join(","))
}
