//! Command-line front end: one command per invocation against a `SessionContext`.

use std::fmt::Write as _;

use clap::{Parser, Subcommand};
use snooze_domain::{NewStory, StoryId};

use crate::application::dto::Section;
use crate::application::services::FavoriteChange;
use crate::application::{SessionContext, SessionError};
use crate::ports::outbound::{StorageProvider, StoryRenderer};

/// Browse and post Hack-or-Snooze stories
#[derive(Debug, Clone, Parser)]
#[command(name = "snooze", version)]
pub struct Cli {
    /// Render stories as HTML list items instead of plain text
    #[arg(long)]
    pub html: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List all stories
    Stories,
    /// List your favorite stories
    Favorites,
    /// List stories you submitted
    Mine,
    /// Log in and remember the session
    Login { username: String, password: String },
    /// Create an account and log in
    Signup {
        username: String,
        password: String,
        /// Display name shown next to your stories
        name: String,
    },
    /// Forget the stored session
    Logout,
    /// Submit a new story
    Submit {
        author: String,
        title: String,
        url: String,
    },
    /// Favorite a story, or unfavorite it if it already is one
    Favorite {
        #[arg(value_name = "STORY_ID")]
        id: StoryId,
    },
    /// Delete one of your stories
    Delete {
        #[arg(value_name = "STORY_ID")]
        id: StoryId,
    },
    /// Show who is logged in
    #[command(name = "whoami")]
    WhoAmI,
}

impl Command {
    /// Listing commands need the story list loaded before they run.
    fn loads_stories(&self) -> bool {
        matches!(self, Self::Stories)
    }

    /// Commands that replace or clear the session have no use for the stored one.
    fn uses_stored_session(&self) -> bool {
        !matches!(self, Self::Login { .. } | Self::Signup { .. } | Self::Logout)
    }
}

/// Run one command and return what should be printed.
pub async fn run<S, R>(
    ctx: &mut SessionContext<S>,
    command: Command,
    renderer: &R,
) -> Result<String, SessionError>
where
    S: StorageProvider,
    R: StoryRenderer + ?Sized,
{
    if command.loads_stories() {
        ctx.start().await?;
    } else if command.uses_stored_session() {
        ctx.restore().await;
    }

    let output = match command {
        Command::Stories => listing(ctx, Section::AllStories, renderer),
        Command::Favorites => listing(ctx, Section::Favorites, renderer),
        Command::Mine => listing(ctx, Section::OwnStories, renderer),
        Command::Login { username, password } => {
            let user = ctx.login(&username, &password).await?;
            format!("Logged in as {}\n{}", user.username, ctx.navigation())
        }
        Command::Signup {
            username,
            password,
            name,
        } => {
            let user = ctx.signup(&username, &password, &name).await?;
            format!("Created account {}\n{}", user.username, ctx.navigation())
        }
        Command::Logout => {
            ctx.logout();
            format!("Logged out\n{}", ctx.navigation())
        }
        Command::Submit { author, title, url } => {
            let story = NewStory::new(author, title, url)?;
            let created = ctx.submit_story(story).await?;
            format!("Submitted {}", created.id)
        }
        Command::Favorite { id } => match ctx.toggle_favorite(id).await? {
            FavoriteChange::Favorited => format!("Favorited {id}"),
            FavoriteChange::Unfavorited => format!("Unfavorited {id}"),
        },
        Command::Delete { id } => {
            ctx.delete_story(id).await?;
            format!("Deleted {id}")
        }
        Command::WhoAmI => match ctx.current_user().user() {
            Some(user) => format!("{} ({})", user.username, user.name),
            None => "Not logged in".to_string(),
        },
    };
    Ok(output)
}

fn listing<S, R>(ctx: &SessionContext<S>, section: Section, renderer: &R) -> String
where
    S: StorageProvider,
    R: StoryRenderer + ?Sized,
{
    let mut out = ctx.navigation().to_string();
    let rendered = ctx.render(section, renderer);
    if rendered.is_empty() {
        out.push_str("\nNo stories");
    }
    for line in rendered {
        let _ = write!(out, "\n{line}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::platform::mock::MemoryStorageProvider;
    use crate::infrastructure::testing::fixtures;
    use crate::infrastructure::TextStoryRenderer;
    use crate::ports::outbound::{storage_keys, MockStoryApiPort};
    use std::sync::Arc;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("snooze").chain(args.iter().copied()))
    }

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(parse(&["stories"]).unwrap().command, Command::Stories);
        assert_eq!(
            parse(&["login", "alice", "hunter2"]).unwrap().command,
            Command::Login {
                username: "alice".into(),
                password: "hunter2".into()
            }
        );
        assert_eq!(
            parse(&["submit", "Alice", "Test", "http://example.com"])
                .unwrap()
                .command,
            Command::Submit {
                author: "Alice".into(),
                title: "Test".into(),
                url: "http://example.com".into()
            }
        );
        let id = StoryId::new();
        assert_eq!(
            parse(&["favorite", &id.to_string()]).unwrap().command,
            Command::Favorite { id }
        );
        assert_eq!(parse(&["whoami"]).unwrap().command, Command::WhoAmI);
    }

    #[test]
    fn html_flag_precedes_the_command() {
        let cli = parse(&["--html", "mine"]).unwrap();
        assert!(cli.html);
        assert_eq!(cli.command, Command::Mine);
        assert!(!parse(&["mine"]).unwrap().html);
    }

    #[test]
    fn bad_invocations_are_rejected() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["frobnicate"]).is_err());
        assert!(parse(&["login", "alice"]).is_err());
        assert!(parse(&["whoami", "extra"]).is_err());
        assert!(parse(&["delete", "nope"]).is_err());
    }

    #[tokio::test]
    async fn login_does_not_restore_the_stored_session() {
        let mut api = MockStoryApiPort::new();
        api.expect_fetch_user().never();
        api.expect_authenticate()
            .times(1)
            .returning(|_, _| Ok(fixtures::user("alice", "Alice", "fresh")));
        let storage = MemoryStorageProvider::new();
        storage.save(storage_keys::TOKEN, "old-token");
        storage.save(storage_keys::USERNAME, "bob");
        let mut ctx = SessionContext::new(Arc::new(api), storage.clone());

        let command = Command::Login {
            username: "alice".into(),
            password: "hunter2".into(),
        };
        let output = run(&mut ctx, command, &TextStoryRenderer).await.unwrap();

        assert!(output.starts_with("Logged in as alice"));
        assert_eq!(storage.load(storage_keys::TOKEN).as_deref(), Some("fresh"));
    }

    #[tokio::test]
    async fn logout_does_not_restore_the_stored_session() {
        let mut api = MockStoryApiPort::new();
        api.expect_fetch_user().never();
        let storage = MemoryStorageProvider::new();
        storage.save(storage_keys::TOKEN, "abc123");
        storage.save(storage_keys::USERNAME, "alice");
        let mut ctx = SessionContext::new(Arc::new(api), storage.clone());

        let output = run(&mut ctx, Command::Logout, &TextStoryRenderer)
            .await
            .unwrap();

        assert_eq!(output, "Logged out\nlogin/signup");
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn whoami_restores_the_stored_session() {
        let mut api = MockStoryApiPort::new();
        api.expect_fetch_user()
            .times(1)
            .returning(|_, _| Ok(Some(fixtures::user("alice", "Alice", "abc123"))));
        let storage = MemoryStorageProvider::new();
        storage.save(storage_keys::TOKEN, "abc123");
        storage.save(storage_keys::USERNAME, "alice");
        let mut ctx = SessionContext::new(Arc::new(api), storage);

        let output = run(&mut ctx, Command::WhoAmI, &TextStoryRenderer)
            .await
            .unwrap();

        assert_eq!(output, "alice (Alice)");
    }
}
