use tagwatch::cache::FileStore;
use tagwatch::config::Config;
use tagwatch::core::TagwatchResult;
use tagwatch::di::CacheStore;

pub async fn clear() -> TagwatchResult<()> {
    let config = Config::load()?;
    let store = FileStore::new(config.get_cache_dir()?)?;

    let removed = store.clear().await?;

    println!("✓ Removed {} cache entr{}", removed, if removed == 1 { "y" } else { "ies" });
    println!("  Location: {}", store.root().display());

    Ok(())
}

pub fn path() -> TagwatchResult<()> {
    let config = Config::load()?;
    println!("{}", config.get_cache_dir()?.display());
    Ok(())
}
