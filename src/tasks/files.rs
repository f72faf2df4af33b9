//! Tasks that write to or read from the user's folders

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::Task;
use crate::Result;
use crate::assistant::Context;
use crate::services;

/// Append `text` to `path`, creating it and its parent directory as needed
pub(crate) fn append(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(text.as_bytes())?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "appended");
    Ok(())
}

/// Keep a spoken file name inside its directory
fn safe_file_name(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
        .collect::<String>()
        .trim_start_matches('.')
        .to_string()
}

/// Writes a text file to the documents directory
pub struct CreateTextFile;

#[async_trait(?Send)]
impl Task for CreateTextFile {
    async fn run(&self, ctx: &mut Context, _command: &str) -> Result<()> {
        let name = safe_file_name(&ctx.ask("Please provide a name for the text file.").await);
        if name.is_empty() {
            ctx.say("File name cannot be empty.").await;
            return Ok(());
        }

        let content = ctx.ask("What would you like to write in the file?").await;

        let dir = ctx.config.paths.documents_dir.clone();
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{name}.txt"));
        fs::write(&path, content)?;
        tracing::info!(path = %path.display(), "text file created");

        ctx.say(&format!(
            "Text file {name}.txt has been created in {}.",
            dir.display()
        ))
        .await;
        Ok(())
    }
}

/// Appends a categorized, timestamped note
pub struct Notes;

#[async_trait(?Send)]
impl Task for Notes {
    async fn run(&self, ctx: &mut Context, _command: &str) -> Result<()> {
        let category = ctx
            .ask("What category do you want to assign to this note? (e.g., personal, work, study)")
            .await;
        let content = ctx.ask("What would you like to note down?").await;

        if content.is_empty() {
            ctx.say("Note content cannot be empty.").await;
            return Ok(());
        }

        let timestamp = ctx.clock.now().format("%Y-%m-%d %H:%M:%S");
        append(
            &ctx.config.paths.notes_file,
            &format!("[{timestamp}] [{category}] {content}\n"),
        )?;

        ctx.say(&format!(
            "Note has been saved under the category '{category}'. Here is what I saved: {content}"
        ))
        .await;
        Ok(())
    }
}

/// Saves a screenshot
pub struct Screenshot;

#[async_trait(?Send)]
impl Task for Screenshot {
    async fn run(&self, ctx: &mut Context, _command: &str) -> Result<()> {
        let dir = ctx.config.paths.screenshots_dir.clone();
        fs::create_dir_all(&dir)?;

        let filename = format!(
            "screenshot_{}.png",
            ctx.clock.now().format("%Y-%m-%d_%H-%M-%S")
        );
        let path = dir.join(&filename);

        let captured = services::call(
            "screenshot",
            ctx.config.timeouts.launch,
            ctx.services.screen.capture(&path),
        )
        .await;

        match captured {
            Ok(()) => {
                ctx.say(&format!("Screenshot taken and saved as {filename}"))
                    .await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "screenshot failed");
                ctx.say("Sorry, I couldn't take a screenshot.").await;
            }
        }
        Ok(())
    }
}

/// Plays the first track in the music directory
pub struct PlayMusic;

#[async_trait(?Send)]
impl Task for PlayMusic {
    async fn run(&self, ctx: &mut Context, _command: &str) -> Result<()> {
        let Some(track) = first_track(&ctx.config.paths.music_dir) else {
            ctx.say("It seems like your music folder is empty.").await;
            return Ok(());
        };

        services::call(
            "launcher",
            ctx.config.timeouts.launch,
            ctx.services.launcher.open_path(&track),
        )
        .await?;
        ctx.say("Enjoy your music!!").await;
        Ok(())
    }
}

/// First visible file in `dir` by name; `None` if missing or empty
fn first_track(dir: &Path) -> Option<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "music directory unreadable");
            return None;
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(std::result::Result::ok)
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .filter(|p| {
            p.file_name()
                .is_some_and(|n| !n.to_string_lossy().starts_with('.'))
        })
        .collect();
    files.sort();
    files.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_file_name() {
        assert_eq!(safe_file_name(" shopping list "), "shopping list");
        assert_eq!(safe_file_name("../etc/passwd"), "_etc_passwd");
        assert_eq!(safe_file_name(""), "");
    }

    #[test]
    fn test_first_track_sorted_and_visible() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.mp3"), b"").unwrap();
        fs::write(dir.path().join("a.mp3"), b"").unwrap();
        fs::write(dir.path().join(".hidden"), b"").unwrap();
        fs::create_dir(dir.path().join("album")).unwrap();

        assert_eq!(first_track(dir.path()), Some(dir.path().join("a.mp3")));
    }

    #[test]
    fn test_first_track_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(first_track(&dir.path().join("nope")), None);
    }

    #[test]
    fn test_append_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("notes.txt");
        append(&path, "one\n").unwrap();
        append(&path, "two\n").unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "one\ntwo\n");
    }
}
