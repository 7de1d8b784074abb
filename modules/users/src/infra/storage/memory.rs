use parking_lot::Mutex;
use serde_json::Number;

use crate::contract::model::{NewUser, User, UserPatch};

/// 6 characters of the default nanoid alphabet: short enough to read out
/// loud, ~5.6e10 combinations.
const ID_LEN: usize = 6;

/// The authoritative in-memory collection of user records.
///
/// The vector preserves insertion order, which is observable through the
/// list operation. Handlers run on a multi-threaded runtime, so every
/// read-modify-write sequence holds the mutex for its full duration.
pub struct UserStore {
    users: Mutex<Vec<User>>,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
        }
    }

    /// Append a record with a fresh unique id. No error condition: the
    /// caller validates fields beforehand.
    pub fn insert(&self, new_user: NewUser) -> User {
        let mut users = self.users.lock();
        let user = User {
            id: fresh_id(&users),
            name: new_user.name,
            age: new_user.age,
        };
        users.push(user.clone());
        user
    }

    /// All records in creation order.
    pub fn list(&self) -> Vec<User> {
        self.users.lock().clone()
    }

    /// Linear scan by id.
    pub fn find(&self, id: &str) -> Option<User> {
        self.users.lock().iter().find(|u| u.id == id).cloned()
    }

    /// Overwrite only the fields present in the patch, in place. Returns
    /// the updated record, or None when the id is unknown.
    pub fn update(&self, id: &str, patch: UserPatch) -> Option<User> {
        let mut users = self.users.lock();
        let user = users.iter_mut().find(|u| u.id == id)?;

        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(age) = patch.age {
            user.age = age;
        }

        Some(user.clone())
    }

    /// Remove the matching record if present; reports whether a removal
    /// occurred.
    pub fn remove(&self, id: &str) -> bool {
        let mut users = self.users.lock();
        let before = users.len();
        users.retain(|u| u.id != id);
        users.len() != before
    }

    /// Insert the demo records the service historically started with.
    /// Gated behind configuration; the store starts empty by default.
    pub fn seed_demo_users(&self) {
        for (name, age) in [("User 1", 16), ("User 2", 18), ("User 3", 20)] {
            self.insert(NewUser {
                name: name.to_string(),
                age: Number::from(age),
            });
        }
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw a new id, re-drawing on collision with an existing record so id
/// uniqueness holds for the lifetime of the store.
fn fresh_id(users: &[User]) -> String {
    loop {
        let id = nanoid::nanoid!(ID_LEN);
        if !users.iter().any(|u| u.id == id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str, age: i64) -> NewUser {
        NewUser {
            name: name.to_string(),
            age: Number::from(age),
        }
    }

    #[test]
    fn insert_assigns_short_unique_ids() {
        let store = UserStore::new();

        let a = store.insert(new_user("Alice", 30));
        let b = store.insert(new_user("Bob", 25));

        assert_eq!(a.id.len(), ID_LEN);
        assert_eq!(b.id.len(), ID_LEN);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn list_preserves_insertion_order() {
        let store = UserStore::new();

        let first = store.insert(new_user("First", 1));
        let second = store.insert(new_user("Second", 2));
        let third = store.insert(new_user("Third", 3));

        let ids: Vec<String> = store.list().into_iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![first.id, second.id, third.id]);
    }

    #[test]
    fn update_is_in_place() {
        let store = UserStore::new();

        let first = store.insert(new_user("First", 1));
        store.insert(new_user("Second", 2));

        let updated = store
            .update(
                &first.id,
                UserPatch {
                    name: Some("Renamed".to_string()),
                    age: None,
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.age, Number::from(1));

        // An edit must not move the record to the end.
        let names: Vec<String> = store.list().into_iter().map(|u| u.name).collect();
        assert_eq!(names, vec!["Renamed", "Second"]);
    }

    #[test]
    fn update_unknown_id_returns_none() {
        let store = UserStore::new();
        assert!(store.update("missing", UserPatch::default()).is_none());
    }

    #[test]
    fn remove_reports_whether_anything_was_removed() {
        let store = UserStore::new();
        let user = store.insert(new_user("Alice", 30));

        assert!(store.remove(&user.id));
        assert!(!store.remove(&user.id));
        assert!(store.list().is_empty());
    }

    #[test]
    fn find_after_remove_is_none() {
        let store = UserStore::new();
        let user = store.insert(new_user("Alice", 30));

        assert!(store.find(&user.id).is_some());
        store.remove(&user.id);
        assert!(store.find(&user.id).is_none());
    }

    #[test]
    fn seed_demo_users_inserts_three_records() {
        let store = UserStore::new();
        store.seed_demo_users();

        let users = store.list();
        assert_eq!(users.len(), 3);
        assert_eq!(users[0].name, "User 1");
        assert_eq!(users[0].age, Number::from(16));
        assert_eq!(users[2].name, "User 3");
    }
}
