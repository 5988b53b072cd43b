use nomad_core::{CoreError, CoreResult, KeyValueStore};
use redis::Commands;
use tracing::{debug, info};

/// Redis-backed store. Every key is namespaced with `prefix` so several
/// deployments can share one server.
#[derive(Clone)]
pub struct RedisStore {
    client: redis::Client,
    prefix: String,
}

impl RedisStore {
    pub fn connect(connection_string: &str, prefix: &str) -> CoreResult<Self> {
        let client = redis::Client::open(connection_string).map_err(redis_error)?;
        info!("Redis store configured for {} (prefix {:?})", connection_string, prefix);
        Ok(Self {
            client,
            prefix: prefix.to_string(),
        })
    }

    fn conn(&self) -> CoreResult<redis::Connection> {
        self.client.get_connection().map_err(redis_error)
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

fn redis_error(err: redis::RedisError) -> CoreError {
    CoreError::StorageError(format!("redis: {}", err))
}

impl KeyValueStore for RedisStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let mut conn = self.conn()?;
        let value: Option<String> = conn.get(self.namespaced(key)).map_err(redis_error)?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let mut conn = self.conn()?;
        conn.set::<_, _, ()>(self.namespaced(key), value)
            .map_err(redis_error)?;
        debug!("SET {}{} ({} bytes)", self.prefix, key, value.len());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        let mut conn = self.conn()?;
        conn.del::<_, ()>(self.namespaced(key)).map_err(redis_error)?;
        Ok(())
    }

    fn keys(&self) -> CoreResult<Vec<String>> {
        let mut conn = self.conn()?;
        let raw: Vec<String> = conn.keys(format!("{}*", self.prefix)).map_err(redis_error)?;
        let mut keys: Vec<String> = raw
            .into_iter()
            .filter_map(|k| k.strip_prefix(&self.prefix).map(str::to_string))
            .collect();
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespacing() {
        // Client::open only parses the URL; no server needed
        let store = RedisStore::connect("redis://127.0.0.1:6379", "nomad:").unwrap();
        assert_eq!(store.namespaced("bookings"), "nomad:bookings");
    }

    #[test]
    fn test_bad_url() {
        let result = RedisStore::connect("not a url", "nomad:");
        assert!(matches!(result, Err(CoreError::StorageError(_))));
    }
}
