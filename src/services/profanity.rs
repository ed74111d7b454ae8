//! Word-list profanity censoring for user-submitted text.
//!
//! A word is censored when, after lowercasing and folding common character
//! substitutions, it is
//! - a listed root or one of its inflections (`bitching`, `asses`, `fuckin`),
//! - a root followed by a compound tail (`shithead`, `asshole`),
//! - a compound head followed by any of the above (`dumbass`, `motherfucking`).

/// Replacement for every censored word
pub const CENSOR: &str = "****";

/// Roots that also match with inflectional suffixes
const ROOTS: &[&str] = &[
    "arse", "ass", "bastard", "bitch", "blowjob", "bollock", "bugger", "bullshit", "chode",
    "coon", "crap", "cunt", "damn", "dildo", "douche", "dyke", "fag", "faggot", "fuck",
    "handjob", "homo", "jerkoff", "jizz", "kike", "masturbate", "motherfuck", "negro",
    "nigga", "nigger", "orgasm", "paki", "piss", "porn", "queef", "retard", "rimjob",
    "shit", "skank", "slut", "smegma", "sodomize", "tosser", "tranny", "twat", "wank",
    "wetback", "whore",
];

/// Words that are only profane as written. Inflecting them would hit
/// ordinary words (`cocker`, `titer`, `cumin`, `shaggy`, `spunky`).
const EXACT: &[&str] = &[
    "anal", "anus", "arsehole", "balls", "ballsack", "boner", "boob", "boobs", "chink",
    "chinks", "clit", "cock", "cocks", "cum", "cumming", "cumshot", "dick", "dicks",
    "felch", "gook", "hooker", "knob", "knobend", "milf", "muff", "nazi", "prick",
    "poof", "pricks", "pube", "pubes", "pussies", "pussy", "scrotum", "shag", "spic",
    "spics", "spunk", "tit", "tits", "titties", "titty", "vagina",
];

const SUFFIXES: &[&str] = &[
    "s", "es", "ed", "er", "ers", "ing", "ings", "in", "y", "ier", "iest", "ies", "ish",
];

/// Second half of compounds such as `shithead`
const TAILS: &[&str] = &[
    "bag", "brain", "face", "fest", "hat", "head", "hole", "lick", "load", "nut",
    "stain", "sucker", "tard", "wad", "weed", "wipe", "wit",
];

/// First half of compounds such as `dumbass`
const HEADS: &[&str] = &[
    "bad", "bull", "chicken", "cluster", "dip", "dumb", "fat", "god", "holy", "horse",
    "jack", "kiss", "lard", "mother", "smart",
];

/// Characters commonly swapped in for letters
fn unleet(c: char) -> char {
    match c {
        '4' | '@' => 'a',
        '3' => 'e',
        '1' | '!' => 'i',
        '0' => 'o',
        '5' | '$' => 's',
        '7' => 't',
        other => other,
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '@' | '$' | '!')
}

/// `stem` is a root, allowing for a doubled final consonant (`shitt-ing`)
fn is_root_stem(stem: &str) -> bool {
    if ROOTS.contains(&stem) {
        return true;
    }
    let mut chars = stem.chars().rev();
    match (chars.next(), chars.next()) {
        (Some(a), Some(b)) if a == b => ROOTS.contains(&&stem[..stem.len() - a.len_utf8()]),
        _ => false,
    }
}

/// A listed word or an inflection of a root
fn is_listed(word: &str) -> bool {
    if ROOTS.contains(&word) || EXACT.contains(&word) {
        return true;
    }
    SUFFIXES.iter().any(|suffix| {
        word.strip_suffix(suffix)
            .is_some_and(|stem| !stem.is_empty() && is_root_stem(stem))
    })
}

fn is_tail(rest: &str) -> bool {
    TAILS.contains(&rest) || rest.strip_suffix('s').is_some_and(|t| TAILS.contains(&t))
}

/// Listed word, or a root/exact word followed by a compound tail
fn is_listed_or_compound(word: &str) -> bool {
    is_listed(word)
        || ROOTS.iter().chain(EXACT).any(|root| {
            word.strip_prefix(root).is_some_and(is_tail)
        })
}

fn is_profane(word: &str) -> bool {
    let normalized: String = word
        .chars()
        .flat_map(char::to_lowercase)
        .map(unleet)
        .collect();

    is_listed_or_compound(&normalized)
        || HEADS.iter().any(|head| {
            normalized
                .strip_prefix(head)
                .is_some_and(|rest| !rest.is_empty() && is_listed_or_compound(rest))
        })
}

fn flush(word: &mut String, out: &mut String) {
    if word.is_empty() {
        return;
    }
    // A trailing '!' is punctuation, not a substituted 'i'
    let trimmed = word.trim_end_matches('!');
    if is_profane(trimmed) {
        out.push_str(CENSOR);
        out.push_str(&word[trimmed.len()..]);
    } else {
        out.push_str(word);
    }
    word.clear();
}

/// Replace each profane word with [`CENSOR`], leaving everything else intact.
/// Matching is whole-word and case-insensitive.
pub fn censor(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();

    for c in text.chars() {
        if is_word_char(c) {
            word.push(c);
        } else {
            flush(&mut word, &mut out);
            out.push(c);
        }
    }
    flush(&mut word, &mut out);

    out
}
