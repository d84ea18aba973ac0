/// Read-through caching around an async computation.
///
/// Returns the cached value for `$key` if present. Otherwise awaits `$block`,
/// hands the result to the background writer with `$ttl` seconds to live, and
/// returns it. Errors from `$block` propagate and are never cached.
///
/// # Arguments
/// * `$cache`: a [`Cache`](crate::db::Cache)
/// * `$key`: a [`CacheKey`](crate::db::CacheKey)
/// * `$ttl`: time-to-live in seconds
/// * `$block`: future producing `AppResult<T>`
///
/// # Example
/// ```rust,ignore
/// let titles = cached!(self.cache, CacheKey::TitleSearch(query.to_string()), 3600, async move {
///     fetch_titles(query).await
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let key = $key;
        if let Some(cached) = $cache.get(&key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.put_in_background(&key, &value, $ttl);
            Ok(value)
        }
    }};
}
