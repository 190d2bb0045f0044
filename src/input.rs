/// One parsed unit of work. Built by the interpreter, consumed by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    SetCapacity(usize),
    Append(Vec<String>),
    Evict(usize),
    List,
    Terminate,
    Malformed { line: usize, text: String },
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Operation::SetCapacity(_)   => "set-capacity",
            Operation::Append(_)        => "append",
            Operation::Evict(_)         => "evict",
            Operation::List             => "list",
            Operation::Terminate        => "terminate",
            Operation::Malformed { .. } => "malformed",
        }
    }

    /// One-line human description, printed by `--describe`.
    pub fn describe(&self) -> String {
        match self {
            Operation::SetCapacity(n)   => format!("Size: {}", n),
            Operation::Append(values)   => format!("Append values: {}", values.join(" ")),
            Operation::Evict(n)         => format!("Remove {} value(s)", n),
            Operation::List             => "List contents".to_string(),
            Operation::Terminate        => "Quit".to_string(),
            Operation::Malformed { .. } => "Error".to_string(),
        }
    }

    /// True for the operations that end a session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Operation::Terminate | Operation::Malformed { .. })
    }
}

/// A command line as classified by its first character, before any
/// follow-up value lines are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header<'a> {
    Append(&'a str),
    Evict(&'a str),
    List,
    Quit,
    Unknown,
}

pub fn classify(line: &str) -> Header<'_> {
    match line.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a') => Header::Append(count_arg(line)),
        Some('r') => Header::Evict(count_arg(line)),
        Some('l') => Header::List,
        Some('q') => Header::Quit,
        _         => Header::Unknown,
    }
}

/// Text after the command letter, minus one optional `' '` or `':'` separator.
/// `A2`, `A 2` and `A:2` all give `"2"`; a bare `A` gives `""`.
fn count_arg(line: &str) -> &str {
    let rest = line.char_indices().nth(1).map_or("", |(i, _)| &line[i..]);
    rest.strip_prefix(|c: char| c == ' ' || c == ':').unwrap_or(rest)
}

/// Strict unsigned parse. Surrounding whitespace is allowed, nothing else.
pub fn parse_count(text: &str) -> Option<usize> {
    let t = text.trim();
    if t.is_empty() || !t.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    t.parse().ok()
}
