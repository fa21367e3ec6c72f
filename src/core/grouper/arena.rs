//! Group storage indexed by group id.
//!
//! Ids are slot indices. Slots are only ever appended, and a retired slot
//! stays empty forever, so an id is never handed out twice.

use super::{GroupId, PhotoGroup};
use crate::core::photo::Photo;

#[derive(Debug, Default)]
pub(super) struct GroupArena {
    slots: Vec<Option<Vec<Photo>>>,
}

impl GroupArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a group holding only `photo`
    pub fn create(&mut self, photo: Photo) -> GroupId {
        let id = self.slots.len();
        self.slots.push(Some(vec![photo]));
        id
    }

    /// Append `photo` to a live group unless it is already a member
    ///
    /// Returns whether the photo was added.
    pub fn add(&mut self, id: GroupId, photo: Photo) -> bool {
        match self.slots.get_mut(id).and_then(Option::as_mut) {
            Some(members) if !members.contains(&photo) => {
                members.push(photo);
                true
            }
            _ => false,
        }
    }

    /// Live groups in ascending id order
    pub fn live(&self) -> impl Iterator<Item = (GroupId, &[Photo])> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_deref().map(|members| (id, members)))
    }

    /// Move the members of every `retired` group into `target`, in order,
    /// and retire those ids
    pub fn merge_into(&mut self, target: GroupId, retired: &[GroupId]) {
        for &id in retired {
            if id == target {
                continue;
            }
            let Some(members) = self.slots.get_mut(id).and_then(Option::take) else {
                continue;
            };
            for photo in members {
                self.add(target, photo);
            }
        }
    }

    pub fn is_live(&self, id: GroupId) -> bool {
        matches!(self.slots.get(id), Some(Some(_)))
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn into_groups(self) -> Vec<PhotoGroup> {
        self.slots
            .into_iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.map(|photos| PhotoGroup { id, photos }))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential() {
        let mut arena = GroupArena::new();

        assert_eq!(arena.create("a.jpg".into()), 0);
        assert_eq!(arena.create("b.jpg".into()), 1);
        assert_eq!(arena.create("c.jpg".into()), 2);
    }

    #[test]
    fn retired_ids_are_not_reused() {
        let mut arena = GroupArena::new();
        let first = arena.create("a.jpg".into());
        let second = arena.create("b.jpg".into());

        arena.merge_into(first, &[second]);
        let third = arena.create("c.jpg".into());

        assert!(!arena.is_live(second));
        assert_eq!(third, 2);
        assert_eq!(arena.live_count(), 2);
    }

    #[test]
    fn merge_keeps_insertion_order() {
        let mut arena = GroupArena::new();
        let a = arena.create("a.jpg".into());
        let b = arena.create("b.jpg".into());
        let c = arena.create("c.jpg".into());
        arena.add(b, "b2.jpg".into());

        arena.merge_into(a, &[b, c]);

        let groups = arena.into_groups();
        assert_eq!(groups.len(), 1);
        let names: Vec<&str> = groups[0].photos.iter().map(|p| p.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg", "b2.jpg", "c.jpg"]);
    }

    #[test]
    fn add_skips_existing_member() {
        let mut arena = GroupArena::new();
        let id = arena.create("a.jpg".into());

        assert!(!arena.add(id, "a.jpg".into()));
        assert!(arena.add(id, "b.jpg".into()));
    }

    #[test]
    fn add_to_retired_group_is_ignored() {
        let mut arena = GroupArena::new();
        let a = arena.create("a.jpg".into());
        let b = arena.create("b.jpg".into());
        arena.merge_into(a, &[b]);

        assert!(!arena.add(b, "c.jpg".into()));
    }

    #[test]
    fn merge_ignores_target_in_list() {
        let mut arena = GroupArena::new();
        let a = arena.create("a.jpg".into());

        arena.merge_into(a, &[a]);

        assert!(arena.is_live(a));
    }
}
