use anyhow::Result;
use serde_json::{from_reader, to_writer_pretty};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::SequenceItem;

use super::show::Show;

/// Loads and saves `.cue` show files. A loaded show's items are fed to the
/// sequencer through `append_item`, in file order, before the show starts.
pub struct ShowManager {
    shows_directory: PathBuf,
    current_show: Option<Show>,
    current_path: Option<PathBuf>,
}

impl ShowManager {
    pub fn new() -> Result<Self> {
        // Shows live in the current working directory by default.
        let shows_dir = std::env::current_dir()?;

        Ok(Self {
            shows_directory: shows_dir,
            current_show: None,
            current_path: None,
        })
    }

    pub fn new_show(&mut self, name: String) -> Show {
        let show = Show::new(name);
        self.current_show = Some(show.clone());
        self.current_path = None;
        show
    }

    pub fn current_show(&self) -> Option<&Show> {
        self.current_show.as_ref()
    }

    pub fn save_show(&mut self, items: Vec<SequenceItem>) -> Result<PathBuf> {
        let show = if let Some(show) = &mut self.current_show {
            show.items = items;
            show.modified_at = SystemTime::now();
            show.clone()
        } else {
            let mut show = Show::new("Untitled Show".to_string());
            show.items = items;
            show
        };

        let path = if let Some(path) = &self.current_path {
            path.clone()
        } else {
            let sanitized_name = show.name.replace(" ", "_").to_lowercase();
            self.shows_directory.join(format!("{}.cue", sanitized_name))
        };

        let file = File::create(&path)?;
        to_writer_pretty(file, &show)?;

        self.current_show = Some(show);
        self.current_path = Some(path.clone());

        Ok(path)
    }

    pub fn save_show_as(
        &mut self,
        name: String,
        path: PathBuf,
        items: Vec<SequenceItem>,
    ) -> Result<PathBuf> {
        let mut show = Show::new(name);
        show.items = items;
        show.modified_at = SystemTime::now();

        let file = File::create(&path)?;
        to_writer_pretty(file, &show)?;

        self.current_show = Some(show);
        self.current_path = Some(path.clone());

        Ok(path)
    }

    pub fn load_show(&mut self, path: &Path) -> Result<Show> {
        let file = File::open(path)?;
        let show: Show = from_reader(file)?;

        self.current_show = Some(show.clone());
        self.current_path = Some(path.to_path_buf());

        Ok(show)
    }

    pub fn list_shows(&self) -> Result<Vec<PathBuf>> {
        let entries = fs::read_dir(&self.shows_directory)?;

        let mut shows = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();

            if path.is_file() && path.extension().map_or(false, |ext| ext == "cue") {
                shows.push(path);
            }
        }

        Ok(shows)
    }
}
