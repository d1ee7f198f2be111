use article_helper::{Outcome, QuestionNode, Recommendation, RuleStore, Verdict, WalkResult};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    #[derive(Debug, Clone, Copy)]
    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            self.paint(s, BOLD)
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            self.paint(s, DIM)
        }
    }
}

pub use ansi::Palette;

pub fn print_outcome(noun: &str, outcome: &Outcome<'_>, palette: &Palette) {
    println!("\n{}", palette.bold(palette.paint(format!("Checking: \"{}\"", noun.trim()), ansi::CYAN)));

    match outcome {
        Outcome::Exception(record) => {
            println!("{}", palette.dim(format!("  found in the exception table as \"{}\"", record.key)));
            print_recommendation(&Recommendation::from_record(record), palette);
        }
        Outcome::Decision { node_id, node } => {
            println!("{}", palette.dim(format!("  reached {node_id}")));
            print_recommendation(&Recommendation::from_terminal(node), palette);
        }
        Outcome::Pending { node_id, node } => {
            println!("{}", palette.dim("  not in the exception table; answer the questions below"));
            print_question(node_id, node, palette);
        }
    }
}

pub fn print_walk(result: &WalkResult<'_>, palette: &Palette) {
    print_outcome(&result.noun, &result.outcome, palette);

    if !result.visited.is_empty() {
        println!("\n{}", palette.paint("━━━ Path ━━━", ansi::GRAY));
        println!("  {}", palette.paint(result.visited.join(" → "), ansi::BLUE));
    }
    if result.outcome.is_pending() {
        println!("\n{}", palette.dim("  Tip: pass another --answer to continue the walk"));
    }
    println!();
}

pub fn print_question(node_id: &str, node: &QuestionNode, palette: &Palette) {
    println!("\n{}", palette.paint(format!("━━━ {node_id} ━━━"), ansi::GRAY));
    println!("  {}", palette.bold(&node.question));
    if let Some(details) = &node.details {
        println!("  {}", palette.dim(details));
    }
    for (idx, label) in node.options.labels().enumerate() {
        println!("  {} {}", palette.paint(format!("[{}]", idx + 1), ansi::YELLOW), label);
    }
}

pub fn print_recommendation(rec: &Recommendation<'_>, palette: &Palette) {
    let title = match rec.verdict {
        Verdict::Use(article) => {
            format!("Recommended article: {}", palette.paint(format!("'{}'", article.as_str().to_uppercase()), ansi::GREEN))
        }
        Verdict::NoArticle => format!("Recommended: {}", palette.paint("no article", ansi::GREEN)),
        Verdict::Guidance => palette.paint("Guidance provided (no article recommendation)", ansi::YELLOW),
    };

    println!("\n  {}", palette.bold(title));
    if !rec.explanation.is_empty() {
        println!("  {}", rec.explanation);
    }
    if let Some(rule_ref) = rec.rule_ref {
        println!("  {}", palette.dim(format!("(Reference: {rule_ref})")));
    }
}

pub fn print_summary(source: &str, strict: bool, store: &RuleStore, palette: &Palette) {
    let questions = store.node_ids().filter_map(|id| store.node(id)).filter(|n| !n.is_terminal()).count();
    let guidance = store
        .node_ids()
        .filter_map(|id| store.node(id).and_then(|n| n.as_terminal()))
        .filter(|t| t.is_guidance())
        .count();

    println!("{} {}", palette.paint("✓", ansi::GREEN), palette.bold(format!("rules OK: {source}")));
    println!(
        "  {} {}  {} {}  {} {}  {} {}",
        palette.dim("exceptions:"),
        palette.paint(store.exception_count().to_string(), ansi::BLUE),
        palette.dim("│ nodes:"),
        palette.paint(store.node_count().to_string(), ansi::BLUE),
        palette.dim("│ questions:"),
        palette.paint(questions.to_string(), ansi::CYAN),
        palette.dim("│ guidance:"),
        palette.paint(guidance.to_string(), ansi::YELLOW),
    );
    println!("  {}", palette.dim(if strict { "checks: strict" } else { "checks: default" }));
}
