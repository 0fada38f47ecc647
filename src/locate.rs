//! folder lookup by name, with deterministic disambiguation
use {
    crate::{client::FolderApi, models::FolderRef, ui::Prompt},
    color_eyre::eyre::Result,
    tracing::debug,
};

/// Find the one folder a batch row refers to.
///
/// The remote index's ordering is kept untouched. Zero hits resolve to
/// `Ok(None)`; a single hit is taken as-is; among multiple hits a unique
/// exact name match wins. Only genuinely ambiguous results fall back to an
/// operator pick, and declining the pick resolves to `Ok(None)`. Transport
/// errors propagate.
pub async fn find_unique(
    api: &dyn FolderApi,
    prompt: &mut dyn Prompt,
    query: &str,
) -> Result<Option<FolderRef>> {
    let hits = api.search(query).await?;
    debug!(query, hits = hits.len(), "folder search");

    match hits.len() {
        0 => Ok(None),
        1 => Ok(Some(FolderRef::from(&hits[0]))),
        _ => {
            let mut exact = hits.iter().filter(|folder| folder.name == query);
            if let (Some(only), None) = (exact.next(), exact.next()) {
                return Ok(Some(FolderRef::from(only)));
            }

            let names: Vec<String> = hits.iter().map(|folder| folder.name.clone()).collect();
            let picked = prompt.select(
                &format!("Several folders match \"{query}\", which one is meant?"),
                &names,
            )?;
            Ok(picked.map(|index| FolderRef::from(&hits[index])))
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{client::testing::FakeFolders, models::TOP_LEVEL_ID, ui::testing::ScriptedPrompt},
    };

    #[tokio::test]
    async fn no_hit_resolves_to_none_without_prompting() {
        let api = FakeFolders::new();
        let mut prompt = ScriptedPrompt::with([]);

        let found = find_unique(&api, &mut prompt, "BIO101").await.unwrap();
        assert!(found.is_none());
        assert_eq!(prompt.remaining(), 0);
    }

    #[tokio::test]
    async fn single_hit_is_taken_without_prompting() {
        let api = FakeFolders::new().with_folder("f1", "BIO101", TOP_LEVEL_ID);
        let mut prompt = ScriptedPrompt::with([]);

        let found = find_unique(&api, &mut prompt, "BIO101").await.unwrap().unwrap();
        assert_eq!(found.id, "f1");
    }

    #[tokio::test]
    async fn unique_exact_name_wins_over_partial_hits() {
        let api = FakeFolders::new()
            .with_folder("f1", "BIO101 (archive)", TOP_LEVEL_ID)
            .with_folder("f2", "BIO101", TOP_LEVEL_ID);
        let mut prompt = ScriptedPrompt::with([]);

        let found = find_unique(&api, &mut prompt, "BIO101").await.unwrap().unwrap();
        assert_eq!(found.id, "f2");
        assert_eq!(prompt.remaining(), 0);
    }

    #[tokio::test]
    async fn ambiguous_hits_go_to_the_operator() {
        let api = FakeFolders::new()
            .with_folder("f1", "BIO101 (old)", TOP_LEVEL_ID)
            .with_folder("f2", "BIO101 (new)", TOP_LEVEL_ID);
        let mut prompt = ScriptedPrompt::with(["1"]);

        let found = find_unique(&api, &mut prompt, "BIO101").await.unwrap().unwrap();
        assert_eq!(found.id, "f2");
    }

    #[tokio::test]
    async fn declined_pick_resolves_to_none() {
        let api = FakeFolders::new()
            .with_folder("f1", "BIO101 (old)", TOP_LEVEL_ID)
            .with_folder("f2", "BIO101 (new)", TOP_LEVEL_ID);
        let mut prompt = ScriptedPrompt::with([""]);

        let found = find_unique(&api, &mut prompt, "BIO101").await.unwrap();
        assert!(found.is_none());
    }
}
