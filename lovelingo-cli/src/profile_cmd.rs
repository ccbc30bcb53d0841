use anyhow::{bail, Context, Result};
use clap::Subcommand;
use lovelingo_core::{answers_from_choices, score_quiz, Gender, LoveLanguage, QuizResult, QUESTIONS};
use std::io::{self, BufRead, Write};

use crate::app::App;
use crate::state::{read_profile, write_profile, PartnerProfile};

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Show the partner profile
    Show,

    /// Set profile fields directly
    Set {
        #[arg(long)]
        name: Option<String>,

        /// e.g. "Quality Time", "acts", "gifts"
        #[arg(long)]
        primary: Option<LoveLanguage>,

        /// Secondary love language ("none" to clear)
        #[arg(long)]
        secondary: Option<String>,

        /// male | female | any
        #[arg(long)]
        gender: Option<String>,
    },

    /// Take the love-language quiz and store the result
    Quiz {
        /// Non-interactive: 1-based answer numbers, comma separated (e.g. 4,1,2,...)
        #[arg(long)]
        answers: Option<String>,
    },
}

pub fn run(app: &mut App, cmd: ProfileCommand) -> Result<()> {
    match cmd {
        ProfileCommand::Show => show(app),
        ProfileCommand::Set {
            name,
            primary,
            secondary,
            gender,
        } => set(app, name, primary, secondary, gender),
        ProfileCommand::Quiz { answers } => quiz(app, answers),
    }
}

fn show(app: &App) -> Result<()> {
    let p = read_profile(&app.home)?;
    let or_unset = |v: Option<String>| v.unwrap_or_else(|| "(not set)".to_string());
    println!("Partner:   {}", or_unset(p.partner_name.clone()));
    println!("Primary:   {}", or_unset(p.primary.map(|l| l.to_string())));
    println!("Secondary: {}", or_unset(p.secondary.map(|l| l.to_string())));
    println!(
        "Gender:    {}",
        match p.gender {
            Some(Gender::Male) => "male",
            Some(Gender::Female) => "female",
            None => "any",
        }
    );
    Ok(())
}

fn set(
    app: &App,
    name: Option<String>,
    primary: Option<LoveLanguage>,
    secondary: Option<String>,
    gender: Option<String>,
) -> Result<()> {
    let mut p = read_profile(&app.home)?;
    if let Some(name) = name {
        p.partner_name = Some(name).filter(|n| !n.trim().is_empty());
    }
    if let Some(primary) = primary {
        p.primary = Some(primary);
    }
    if let Some(s) = secondary {
        p.secondary = if s.trim().eq_ignore_ascii_case("none") {
            None
        } else {
            Some(s.parse()?)
        };
    }
    if let Some(g) = gender {
        p.gender = if g.trim().eq_ignore_ascii_case("any") {
            None
        } else {
            Some(g.parse()?)
        };
    }
    stamp(&mut p);
    write_profile(&app.home, &p)?;
    println!("Profile saved.");
    Ok(())
}

fn stamp(p: &mut PartnerProfile) {
    if p.created_at_utc.is_none() {
        p.created_at_utc = Some(chrono::Utc::now().to_rfc3339());
    }
}

/// Parse "4, 1,2" into 0-based choices.
pub fn parse_choices(s: &str) -> Result<Vec<usize>> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| {
            let n: usize = t.parse().with_context(|| format!("not a number: {t}"))?;
            if n == 0 {
                bail!("answers are numbered from 1");
            }
            Ok(n - 1)
        })
        .collect()
}

fn ask_all() -> Result<Vec<usize>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut choices = Vec::with_capacity(QUESTIONS.len());

    for (i, q) in QUESTIONS.iter().enumerate() {
        println!("\n{}/{}  {}", i + 1, QUESTIONS.len(), q.prompt);
        for (n, (text, _)) in q.answers.iter().enumerate() {
            println!("  {}) {}", n + 1, text);
        }
        loop {
            print!("> ");
            io::stdout().flush().ok();
            let Some(line) = lines.next() else {
                bail!("quiz aborted");
            };
            match line?.trim().parse::<usize>() {
                Ok(n) if (1..=q.answers.len()).contains(&n) => {
                    choices.push(n - 1);
                    break;
                }
                _ => println!("Pick 1-{}", q.answers.len()),
            }
        }
    }
    Ok(choices)
}

fn quiz(app: &App, answers: Option<String>) -> Result<()> {
    let choices = match answers {
        Some(s) => parse_choices(&s)?,
        None => ask_all()?,
    };
    let result = score_quiz(&answers_from_choices(&choices)?)?;
    apply_quiz(app, &result)?;

    println!("\nPrimary love language: {}", result.primary);
    if let Some(s) = result.secondary {
        println!("Secondary: {s}");
    }
    for (lang, n) in &result.scores {
        println!("  {:<22} {}", lang.to_string(), n);
    }
    Ok(())
}

fn apply_quiz(app: &App, result: &QuizResult) -> Result<()> {
    let mut p = read_profile(&app.home)?;
    p.primary = Some(result.primary);
    p.secondary = result.secondary;
    stamp(&mut p);
    write_profile(&app.home, &p)
}
