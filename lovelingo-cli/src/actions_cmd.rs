use anyhow::Result;
use clap::Subcommand;
use lovelingo_core::{Action, ActionDraft, ForGender, LoveLanguage, Tier};

use crate::app::App;

#[derive(Subcommand, Debug)]
pub enum ActionsCommand {
    /// List the action catalog (built-in plus your own)
    List {
        #[arg(long)]
        language: Option<LoveLanguage>,

        /// quick | medium | special | grand
        #[arg(long)]
        tier: Option<Tier>,

        /// Only actions you created
        #[arg(long, default_value_t = false)]
        mine: bool,
    },

    /// Add a custom action
    Add {
        title: String,

        #[arg(long)]
        language: LoveLanguage,

        #[arg(long)]
        tier: Tier,

        #[arg(long, default_value = "")]
        description: String,

        /// Comma-separated tags
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        #[arg(long, default_value = "any")]
        for_gender: ForGender,

        #[arg(long)]
        link: Option<String>,
    },
}

pub fn run(app: &mut App, cmd: ActionsCommand) -> Result<()> {
    match cmd {
        ActionsCommand::List { language, tier, mine } => list(app, language, tier, mine),
        ActionsCommand::Add {
            title,
            language,
            tier,
            description,
            tags,
            for_gender,
            link,
        } => {
            let draft = ActionDraft {
                title,
                description,
                love_language: language,
                tier,
                tags: tags.into_iter().map(|t| t.trim().to_string()).filter(|t| !t.is_empty()).collect(),
                for_gender,
                product_link: link,
            };
            let user = app.user().to_string();
            let action = app.planner.add_custom_action(&user, draft)?;
            println!("Added {} ({})", action.id, action.title);
            Ok(())
        }
    }
}

pub fn format_action(a: &Action) -> String {
    let mut line = format!("{:<14} [{:<7}] {:<20} {}", a.id, a.tier.effort_text(), a.love_language.label(), a.title);
    if a.like_count + a.dislike_count > 0 {
        line.push_str(&format!("  (+{} / -{})", a.like_count, a.dislike_count));
    }
    line
}

fn list(app: &App, language: Option<LoveLanguage>, tier: Option<Tier>, mine: bool) -> Result<()> {
    let catalog = app.planner.catalog_for(app.user())?;
    let rows: Vec<&Action> = catalog
        .iter()
        .filter(|a| language.is_none_or(|l| a.love_language == l))
        .filter(|a| tier.is_none_or(|t| a.tier == t))
        .filter(|a| !mine || a.owner_id.as_deref() == Some(app.user()))
        .collect();

    if rows.is_empty() {
        println!("No actions match.");
        return Ok(());
    }
    for a in rows {
        println!("{}", format_action(a));
    }
    Ok(())
}
