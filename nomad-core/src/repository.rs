use crate::CoreResult;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Well-known keys of the persisted application state.
pub mod keys {
    pub const CURRENT_USER: &str = "currentUser";
    pub const REGISTERED_USERS: &str = "registeredUsers";
    pub const BOOKINGS: &str = "bookings";
    pub const USER_FAVORITES: &str = "userFavorites";
    pub const FAVORITES_DATA: &str = "favoritesData";
    pub const DESTINATION_REVIEWS: &str = "destinationReviews";
    pub const LANGUAGE: &str = "language";
    pub const COMMUNITY_POSTS: &str = "communityPosts";

    pub const ALL: [&str; 8] = [
        CURRENT_USER,
        REGISTERED_USERS,
        BOOKINGS,
        USER_FAVORITES,
        FAVORITES_DATA,
        DESTINATION_REVIEWS,
        LANGUAGE,
        COMMUNITY_POSTS,
    ];
}

/// String-keyed store of JSON documents shared by every manager.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> CoreResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> CoreResult<()>;

    fn remove(&self, key: &str) -> CoreResult<()>;

    fn keys(&self) -> CoreResult<Vec<String>>;
}

/// Typed access on top of any [`KeyValueStore`].
pub trait JsonStoreExt: KeyValueStore {
    /// Missing keys read as `T::default()`, like an empty array or map.
    fn load_json<T: DeserializeOwned + Default>(&self, key: &str) -> CoreResult<T> {
        Ok(self.load_json_opt(key)?.unwrap_or_default())
    }

    fn load_json_opt<T: DeserializeOwned>(&self, key: &str) -> CoreResult<Option<T>> {
        match self.get(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> CoreResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}

impl<S: KeyValueStore + ?Sized> JsonStoreExt for S {}
