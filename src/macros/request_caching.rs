/// check if a request is in the cache, if it is, respond with it.
/// else follow the normal flow
///
/// the type of the cached data is taken from the argument of `$respond`
macro_rules! read_cache_request {
    ( $cache:expr, $origin:expr, $respond:expr ) => {
        let uri = $origin.path().to_string();
        if let Some(data) = $cache.get(&uri) {
            log::debug!(target: "macros/request_caching:read_cache_request", "serving {} from cache", uri);
            return $respond(data);
        }
    };
}

/// add the response to the request to the cache and then respond with it.
macro_rules! cache_response {
    ( $cache:expr, $origin:expr, $data:expr, $respond:expr ) => {{
        let data = $data;
        $cache.insert(&$origin.path().to_string(), &data);
        return $respond(data);
    }};
}

pub(crate) use cache_response;
pub(crate) use read_cache_request;
