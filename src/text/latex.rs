//! Repairs for LaTeX defects commonly found in authored quiz text.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Greek letter commands that must be separated from a following letter.
pub const GREEK_LETTERS: &[&str] = &[
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "omicron", "pi", "rho", "sigma", "tau", "upsilon", "phi", "chi",
    "psi", "omega", "Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta", "Eta", "Theta", "Iota",
    "Kappa", "Lambda", "Mu", "Nu", "Xi", "Omicron", "Pi", "Rho", "Sigma", "Tau", "Upsilon", "Phi",
    "Chi", "Psi", "Omega", "varepsilon", "vartheta", "varpi", "varrho", "varsigma", "varphi",
];

const TILDE_SPACERS: &[&str] = &["$~$", "$~ $"];

fn greek_command() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let mut names: Vec<&str> = GREEK_LETTERS.to_vec();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = names.join("|");
        Regex::new(&format!(r"\\({alternation})([a-zA-Z])")).expect("invalid greek regex")
    })
}

fn tilde_math_span() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$([^$]+~[^$]+)\$").expect("invalid math span regex"))
}

fn digit_range() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d)~(\d)").expect("invalid digit range regex"))
}

fn unit_range() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"([°%])~(\d)").expect("invalid unit range regex"))
}

/// Fix malformed LaTeX fragments in free text.
///
/// Three repairs run in order: a space is inserted between a Greek letter command and a
/// letter running into it (`\Deltav` becomes `\Delta v`), stray `$~$` spacers are dropped,
/// and a tilde used as a range marker inside a math span becomes `\sim`
/// (`$10~13$` becomes `$10 \sim 13$`). Empty input is returned as is.
pub fn normalize(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let spaced = greek_command().replace_all(text, |caps: &Captures| {
        format!("\\{} {}", &caps[1], &caps[2])
    });

    let mut despaced = spaced.into_owned();
    for spacer in TILDE_SPACERS {
        despaced = despaced.replace(spacer, "");
    }

    tilde_math_span()
        .replace_all(&despaced, |caps: &Captures| {
            format!("${}$", fix_tilde_ranges(&caps[1]))
        })
        .into_owned()
}

fn fix_tilde_ranges(span: &str) -> String {
    let fixed = digit_range().replace_all(span, |caps: &Captures| {
        format!("{} \\sim {}", &caps[1], &caps[2])
    });
    unit_range()
        .replace_all(&fixed, |caps: &Captures| {
            format!("{} \\sim {}", &caps[1], &caps[2])
        })
        .into_owned()
}
