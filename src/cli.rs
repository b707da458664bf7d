//! Command-line token parsing.
//!
//! The CLI uses a free-form token model rather than a rigid grammar: any
//! `-`-prefixed token opens a new option, and every following non-dash token
//! is collected as one of its values. An option that gathers zero values is
//! stored as a boolean flag instead. Unknown options are never rejected;
//! they simply sit unread in the map.

use std::collections::{HashMap, HashSet};

/// How many values an option consumes, for the usage text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Flag,
    Single,
    Multi,
}

/// Declarative description of one CLI option: its aliases, arity and help
/// line. The schema drives both the usage text and typed lookup, so the
/// option table exists in exactly one place.
#[derive(Debug)]
pub struct OptionSpec {
    pub short: &'static str,
    pub long: &'static str,
    pub arity: Arity,
    pub value_name: &'static str,
    pub help: &'static str,
}

pub const OPT_INPUT: OptionSpec = OptionSpec {
    short: "-i",
    long: "--input",
    arity: Arity::Multi,
    value_name: "<paths>",
    help: "input image files and/or directories (default: current directory)",
};

pub const OPT_OUTPUT: OptionSpec = OptionSpec {
    short: "-o",
    long: "--output",
    arity: Arity::Single,
    value_name: "<path>",
    help: "output PDF path (default: ./output.pdf)",
};

pub const OPT_KEEP_SIZE: OptionSpec = OptionSpec {
    short: "-k",
    long: "--keep-size",
    arity: Arity::Single,
    value_name: "<bool>",
    help: "size each page to the image's pixel dimensions (default: true)",
};

pub const OPT_TYPE: OptionSpec = OptionSpec {
    short: "-t",
    long: "--type",
    arity: Arity::Multi,
    value_name: "<exts>",
    help: "extension allow-list, e.g. `png jpg` (default: png jpg jpeg bmp gif tiff)",
};

pub const OPT_SORT: OptionSpec = OptionSpec {
    short: "-s",
    long: "--sort",
    arity: Arity::Single,
    value_name: "<order>",
    help: "per-directory file order: name (default), mtime, ctime",
};

pub const OPT_HELP: OptionSpec = OptionSpec {
    short: "-h",
    long: "--help",
    arity: Arity::Flag,
    value_name: "",
    help: "print this help and exit",
};

pub const OPTIONS: &[&OptionSpec] = &[
    &OPT_INPUT,
    &OPT_OUTPUT,
    &OPT_KEEP_SIZE,
    &OPT_TYPE,
    &OPT_SORT,
    &OPT_HELP,
];

/// The raw option store produced by tokenizing the command line.
///
/// An option name lives either in the value map or in the flag set, never
/// both: whichever form its *last* occurrence took wins. Re-declaring an
/// option replaces its earlier value list entirely.
#[derive(Debug, Default)]
pub struct ParsedArgs {
    options: HashMap<String, Vec<String>>,
    flags: HashSet<String>,
}

impl ParsedArgs {
    pub fn parse<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = Self::default();
        let mut current: Option<(String, Vec<String>)> = None;

        for arg in args {
            let arg = arg.into();
            if arg.starts_with('-') {
                // A dash token closes the accumulating option and opens a
                // new one.
                if let Some((name, values)) = current.take() {
                    parsed.store(name, values);
                }
                current = Some((arg, Vec::new()));
            } else if let Some((_, values)) = current.as_mut() {
                values.push(arg);
            }
            // Leading non-dash tokens belong to no option and are dropped.
        }
        if let Some((name, values)) = current.take() {
            parsed.store(name, values);
        }

        parsed
    }

    fn store(&mut self, name: String, values: Vec<String>) {
        // Last occurrence decides whether the name is a flag or a valued
        // option; clear any earlier record of the other kind.
        if values.is_empty() {
            self.options.remove(&name);
            self.flags.insert(name);
        } else {
            self.flags.remove(&name);
            self.options.insert(name, values);
        }
    }

    pub fn has_flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }

    pub fn has_option(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    pub fn option_value(&self, name: &str) -> Option<&str> {
        self.options
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn option_values(&self, name: &str) -> Option<&[String]> {
        self.options.get(name).map(Vec::as_slice)
    }

    // --- schema-aware lookup, checking the short alias before the long ---

    pub fn flag(&self, spec: &OptionSpec) -> bool {
        self.has_flag(spec.short) || self.has_flag(spec.long)
    }

    pub fn value(&self, spec: &OptionSpec) -> Option<&str> {
        self.option_value(spec.short)
            .or_else(|| self.option_value(spec.long))
    }

    pub fn values(&self, spec: &OptionSpec) -> Option<&[String]> {
        self.option_values(spec.short)
            .or_else(|| self.option_values(spec.long))
    }
}

/// Render the usage text from the option schema.
pub fn usage() -> String {
    let mut text = String::from("Usage: img2pdf [options]\n\nOptions:\n");
    for spec in OPTIONS {
        let mut left = format!("  {}, {}", spec.short, spec.long);
        if spec.arity != Arity::Flag {
            left.push(' ');
            left.push_str(spec.value_name);
        }
        text.push_str(&format!("{left:<28}{}\n", spec.help));
    }
    text.push_str(
        "\nExamples:\n\
         \x20 img2pdf\n\
         \x20 img2pdf -i photo1.png photo2.jpg -o album.pdf\n\
         \x20 img2pdf -i ./scans -o scans.pdf -t png -s mtime\n\
         \x20 img2pdf -i ./scans -o scans.pdf -t png jpg -k false\n",
    );
    text
}
