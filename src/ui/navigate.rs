//! interactive destination picker
use {
    super::Prompt,
    crate::{
        client::FolderApi,
        models::{FolderRef, TOP_LEVEL_ID},
    },
    color_eyre::eyre::Result,
};

fn top_level() -> FolderRef {
    FolderRef {
        id: TOP_LEVEL_ID.to_string(),
        name: String::new(),
    }
}

/// Walks the folder tree one command at a time until the operator confirms a
/// destination. The only state is the current folder; invalid input reprints
/// the menu without moving.
pub struct Navigator<'a> {
    api: &'a dyn FolderApi,
    prompt: &'a mut dyn Prompt,
}

impl<'a> Navigator<'a> {
    pub fn new(api: &'a dyn FolderApi, prompt: &'a mut dyn Prompt) -> Self {
        Self { api, prompt }
    }

    /// Run the navigation loop. Starts with a subject search so the operator
    /// lands near the right subtree, then browses until a folder is confirmed
    /// with `c`.
    pub async fn select_destination(&mut self) -> Result<FolderRef> {
        println!("What subject is being processed? (eg. Biology)");
        let mut current = match self.search_jump().await? {
            Some(folder) => folder,
            None => top_level(),
        };

        loop {
            let parent = self.display_folder(&mut current).await?;
            let children = self.api.children(&current.id).await?;

            println!();
            println!("Sub folders:");
            for (index, child) in children.iter().enumerate() {
                println!("  [{index}]: {}", child.name);
            }
            println!();
            println!("[P] Go to parent");
            println!("[R] Rename this folder");
            println!("[D] Delete this folder");
            println!("[S] Search folders");
            println!("[L] List sessions in the folder");
            println!("[C] Confirm this folder as the destination");

            let command = self
                .prompt
                .line("Enter the command (or a folder number to descend):")?;
            let command = command.trim();

            if let Ok(index) = command.parse::<usize>() {
                match children.get(index) {
                    Some(child) => current = FolderRef::from(child),
                    None => println!("No such folder number."),
                }
                continue;
            }

            let at_top = current.id == TOP_LEVEL_ID;
            match command.to_ascii_lowercase().as_str() {
                "p" => current = parent,
                "r" if !at_top => self.rename_current(&mut current).await?,
                "d" if !at_top => {
                    if self.delete_current(&current).await? {
                        current = parent;
                    }
                }
                "s" => {
                    if let Some(folder) = self.search_jump().await? {
                        current = folder;
                    }
                }
                "l" if !at_top => self.list_sessions(&current).await?,
                "c" if !at_top => return Ok(current),
                "r" | "d" | "l" | "c" => {
                    println!("Not available at the top level, descend into a folder first.");
                }
                _ => println!("Invalid command."),
            }
        }
    }

    /// Print the current folder's detail and return its parent. The top-level
    /// sentinel has no detail fetch; it is its own parent.
    async fn display_folder(&mut self, current: &mut FolderRef) -> Result<FolderRef> {
        println!();
        println!("Folder:");
        if current.id == TOP_LEVEL_ID {
            println!("  Top level folder (no detail information is available)");
            return Ok(top_level());
        }

        let folder = self.api.get(&current.id).await?;
        println!("  Name: {}", folder.name);
        println!("  Id: {}", folder.id);
        match &folder.parent_folder {
            Some(parent) => println!("  Parent folder: {}", parent.name),
            None => println!("  Parent folder: Top level folder"),
        }
        if let Some(urls) = &folder.urls {
            println!("  Folder URL: {}", urls.folder_url);
            println!("  Embed URL: {}", urls.embed_url);
            println!("  Share settings URL: {}", urls.share_settings_url);
        }

        // renames elsewhere may have changed it
        current.name = folder.name.clone();

        Ok(folder
            .parent_folder
            .as_ref()
            .map(|parent| FolderRef {
                id: parent.id.clone(),
                name: parent.name.clone(),
            })
            .unwrap_or_else(top_level))
    }

    async fn rename_current(&mut self, current: &mut FolderRef) -> Result<()> {
        let new_name = self.prompt.line("Enter the new name:")?;
        if self.api.update_name(&current.id, &new_name).await? {
            current.name = new_name;
        } else {
            println!("Rename refused, a sibling already carries that name.");
        }
        Ok(())
    }

    async fn delete_current(&mut self, current: &FolderRef) -> Result<bool> {
        let sure = self
            .prompt
            .confirm(&format!("Delete \"{}\"?", current.name), false)?;
        if !sure {
            return Ok(false);
        }
        let deleted = self.api.delete(&current.id).await?;
        if !deleted {
            println!("The service refused to delete this folder.");
        }
        Ok(deleted)
    }

    async fn search_jump(&mut self) -> Result<Option<FolderRef>> {
        let query = self.prompt.line("Enter search keyword:")?;
        let hits = self.api.search(&query).await?;
        if hits.is_empty() {
            println!("  No hit.");
            return Ok(None);
        }

        let names: Vec<String> = hits.iter().map(|folder| folder.name.clone()).collect();
        let picked = self.prompt.select("Pick a folder:", &names)?;
        Ok(picked.map(|index| FolderRef::from(&hits[index])))
    }

    async fn list_sessions(&mut self, current: &FolderRef) -> Result<()> {
        println!("Sessions in the folder:");
        let sessions = self.api.sessions(&current.id).await?;
        if sessions.is_empty() {
            println!("  (none)");
        }
        for session in sessions {
            println!("  {}: {}", session.id, session.name);
        }
        Ok(())
    }
}
