//! Three-phase family grouping over a face analyzer.

use super::arena::GroupArena;
use super::{GroupId, GroupingResult, ThresholdStrategy};
use crate::core::analyzer::FaceAnalyzer;
use crate::core::cache::FaceCountCache;
use crate::core::photo::{Distance, Photo, PhotoKind};
use crate::error::InputError;
use crate::events::{
    null_sender, Event, EventSender, GroupEvent, GroupingEvent, GroupingPhase, GroupingSummary,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Input photos sorted by kind, input order preserved
struct Classification {
    individuals: Vec<Photo>,
    families: Vec<Photo>,
    without_faces: Vec<Photo>,
    kinds: HashMap<Photo, PhotoKind>,
}

/// Groups photos of overlapping people
///
/// Borrows the analyzer and the shared face count cache; groups exist only
/// for the duration of one [`group`](Self::group) call. Analyzer calls are
/// made sequentially in a fixed order, which the first-match rule depends on.
pub struct PhotoGrouper<'a> {
    analyzer: &'a dyn FaceAnalyzer,
    cache: &'a FaceCountCache,
    strategy: ThresholdStrategy,
}

impl<'a> PhotoGrouper<'a> {
    /// Create a grouper using the default threshold
    pub fn new(analyzer: &'a dyn FaceAnalyzer, cache: &'a FaceCountCache) -> Self {
        Self {
            analyzer,
            cache,
            strategy: ThresholdStrategy::default(),
        }
    }

    /// Use a different match threshold
    pub fn with_strategy(mut self, strategy: ThresholdStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn strategy(&self) -> &ThresholdStrategy {
        &self.strategy
    }

    /// Whether the photo shows more than one face
    pub fn is_family_photo(&self, photo: &Photo) -> bool {
        self.cache.get(photo, self.analyzer) > 1
    }

    /// Group photos without progress reporting
    pub fn group(&self, photos: &[Photo]) -> Result<GroupingResult, InputError> {
        self.group_with_events(photos, &null_sender())
    }

    /// Group photos, reporting progress through `events`
    ///
    /// Fails only on empty input. Analyzer failures degrade to "no faces"
    /// and "no match" instead of failing the run.
    pub fn group_with_events(
        &self,
        photos: &[Photo],
        events: &EventSender,
    ) -> Result<GroupingResult, InputError> {
        if photos.is_empty() {
            return Err(InputError::NoPhotos);
        }

        events.send(Event::Grouping(GroupingEvent::Started {
            total_photos: photos.len(),
        }));

        let classification = self.classify(photos, events);

        let mut arena = GroupArena::new();
        self.cluster_individuals(&classification.individuals, &mut arena, events);
        self.bridge_families(
            &classification.families,
            &classification.individuals,
            &mut arena,
            events,
        );

        let summary = GroupingSummary {
            total_groups: arena.live_count(),
            individual_photos: classification.individuals.len(),
            family_photos: classification.families.len(),
            photos_without_faces: classification.without_faces.len(),
        };
        info!(
            groups = summary.total_groups,
            individuals = summary.individual_photos,
            families = summary.family_photos,
            without_faces = summary.photos_without_faces,
            "Grouping complete"
        );
        events.send(Event::Grouping(GroupingEvent::Completed(summary)));

        Ok(GroupingResult {
            groups: arena.into_groups(),
            kinds: classification.kinds,
            photos_without_faces: classification.without_faces,
            total_photos: photos.len(),
        })
    }

    /// Phase 1: sort photos into individual and family photos
    ///
    /// A repeated identifier is classified once and only its first
    /// occurrence is grouped.
    fn classify(&self, photos: &[Photo], events: &EventSender) -> Classification {
        events.send(phase_changed(GroupingPhase::Classifying, photos.len()));

        let mut classification = Classification {
            individuals: Vec::new(),
            families: Vec::new(),
            without_faces: Vec::new(),
            kinds: HashMap::new(),
        };

        for (index, photo) in photos.iter().enumerate() {
            if !classification.kinds.contains_key(photo) {
                let kind = PhotoKind::from_face_count(self.cache.get(photo, self.analyzer));
                classification.kinds.insert(photo.clone(), kind);

                match kind {
                    PhotoKind::Individual => classification.individuals.push(photo.clone()),
                    PhotoKind::Family => classification.families.push(photo.clone()),
                    PhotoKind::Empty => classification.without_faces.push(photo.clone()),
                }

                events.send(Event::Grouping(GroupingEvent::PhotoClassified {
                    photo: photo.clone(),
                    kind,
                }));
            } else {
                debug!(photo = %photo, "Skipping repeated photo");
            }

            events.send(progress(GroupingPhase::Classifying, index + 1));
        }

        info!(
            "Processing {} individual photos and {} family photos",
            classification.individuals.len(),
            classification.families.len()
        );

        classification
    }

    /// Phase 2: greedy first-match clustering of individual photos
    fn cluster_individuals(&self, individuals: &[Photo], arena: &mut GroupArena, events: &EventSender) {
        events.send(phase_changed(GroupingPhase::Clustering, individuals.len()));

        for (index, photo) in individuals.iter().enumerate() {
            match self.first_matching_group(photo, arena) {
                Some(group_id) => {
                    arena.add(group_id, photo.clone());
                    info!("Added individual photo {} to group {}", photo, group_id);
                    events.send(Event::Group(GroupEvent::PhotoAdded {
                        group_id,
                        photo: photo.clone(),
                    }));
                }
                None => {
                    let group_id = arena.create(photo.clone());
                    info!("Created new group {} for individual photo {}", group_id, photo);
                    events.send(Event::Group(GroupEvent::Created {
                        group_id,
                        photo: photo.clone(),
                    }));
                }
            }

            events.send(progress(GroupingPhase::Clustering, index + 1));
        }
    }

    /// Lowest-id live group with a member matching `photo`
    ///
    /// Members are checked in insertion order and the scan stops at the
    /// first match.
    fn first_matching_group(&self, photo: &Photo, arena: &GroupArena) -> Option<GroupId> {
        arena
            .live()
            .find(|(_, members)| members.iter().any(|member| self.matches(photo, member)))
            .map(|(group_id, _)| group_id)
    }

    /// Phase 3: attach family photos and merge the groups they bridge
    fn bridge_families(
        &self,
        families: &[Photo],
        individuals: &[Photo],
        arena: &mut GroupArena,
        events: &EventSender,
    ) {
        events.send(phase_changed(GroupingPhase::Bridging, families.len()));

        for (index, family_photo) in families.iter().enumerate() {
            // Always matched against the full individual list, not against
            // the current group layout.
            let matching = self.matching_individuals(family_photo, individuals);

            let groups_to_merge: Vec<GroupId> = arena
                .live()
                .filter(|(_, members)| members.iter().any(|member| matching.contains(member)))
                .map(|(group_id, _)| group_id)
                .collect();

            match groups_to_merge.split_first() {
                Some((&target, retired)) => {
                    if arena.add(target, family_photo.clone()) {
                        events.send(Event::Group(GroupEvent::PhotoAdded {
                            group_id: target,
                            photo: family_photo.clone(),
                        }));
                    }

                    if !retired.is_empty() {
                        arena.merge_into(target, retired);
                        events.send(Event::Group(GroupEvent::Merged {
                            target,
                            retired: retired.to_vec(),
                            family_photo: family_photo.clone(),
                        }));
                    }

                    debug_assert!(arena.is_live(target));
                    info!(
                        "Merged groups {:?} after processing family photo {}",
                        groups_to_merge, family_photo
                    );
                }
                None => {
                    let group_id = arena.create(family_photo.clone());
                    info!("Created new group {} for family photo {}", group_id, family_photo);
                    events.send(Event::Group(GroupEvent::Created {
                        group_id,
                        photo: family_photo.clone(),
                    }));
                }
            }

            events.send(progress(GroupingPhase::Bridging, index + 1));
        }
    }

    /// Individual photos whose face appears in `family_photo`
    fn matching_individuals<'p>(&self, family_photo: &Photo, individuals: &'p [Photo]) -> HashSet<&'p Photo> {
        individuals
            .iter()
            .filter(|individual| self.matches(family_photo, individual))
            .inspect(|individual| debug!("Found matching individual photo {}", individual))
            .collect()
    }

    fn matches(&self, a: &Photo, b: &Photo) -> bool {
        self.strategy.is_match(self.distance(a, b))
    }

    /// Distance between two photos; a failed comparison is infinitely far
    fn distance(&self, a: &Photo, b: &Photo) -> Distance {
        match self.analyzer.compare(a, b) {
            Ok(distance) => distance,
            Err(e) => {
                warn!(error = %e, "Face comparison failed, treating photos as different people");
                Distance::INFINITY
            }
        }
    }
}

fn phase_changed(phase: GroupingPhase, total: usize) -> Event {
    Event::Grouping(GroupingEvent::PhaseChanged { phase, total })
}

fn progress(phase: GroupingPhase, completed: usize) -> Event {
    Event::Grouping(GroupingEvent::Progress { phase, completed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::analyzer::ManifestAnalyzer;
    use crate::core::grouper::PhotoGroup;
    use crate::events::EventChannel;

    fn photos(ids: &[&str]) -> Vec<Photo> {
        ids.iter().map(|id| Photo::from(*id)).collect()
    }

    fn names(group: &PhotoGroup) -> Vec<&str> {
        group.photos.iter().map(|p| p.as_str()).collect()
    }

    fn sorted_names(group: &PhotoGroup) -> Vec<&str> {
        let mut names = names(group);
        names.sort();
        names
    }

    /// Three individuals who are all different people
    fn strangers() -> ManifestAnalyzer {
        ManifestAnalyzer::new()
            .with_faces("a.jpg", 1)
            .with_faces("b.jpg", 1)
            .with_faces("c.jpg", 1)
            .with_default_distance(0.9)
    }

    #[test]
    fn empty_input_rejected() {
        let analyzer = strangers();
        let cache = FaceCountCache::new();
        let grouper = PhotoGrouper::new(&analyzer, &cache);

        assert_eq!(grouper.group(&[]).unwrap_err(), InputError::NoPhotos);
    }

    #[test]
    fn unmatched_individuals_get_fresh_ids() {
        let analyzer = strangers();
        let cache = FaceCountCache::new();
        let grouper = PhotoGrouper::new(&analyzer, &cache);

        let result = grouper.group(&photos(&["a.jpg", "b.jpg", "c.jpg"])).unwrap();

        let ids: Vec<GroupId> = result.groups.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert!(result.groups.iter().all(|g| g.len() == 1));
    }

    #[test]
    fn matching_individuals_share_group() {
        let analyzer = strangers().with_distance("a.jpg", "b.jpg", 0.2);
        let cache = FaceCountCache::new();
        let grouper = PhotoGrouper::new(&analyzer, &cache);

        let result = grouper.group(&photos(&["a.jpg", "b.jpg", "c.jpg"])).unwrap();

        assert_eq!(result.total_groups(), 2);
        assert_eq!(names(result.group(0).unwrap()), vec!["a.jpg", "b.jpg"]);
        assert_eq!(names(result.group(1).unwrap()), vec!["c.jpg"]);
    }

    #[test]
    fn first_matching_group_wins() {
        // c matches both a and b; a's group was created first
        let analyzer = strangers()
            .with_distance("c.jpg", "a.jpg", 0.5)
            .with_distance("c.jpg", "b.jpg", 0.1);
        let cache = FaceCountCache::new();
        let grouper = PhotoGrouper::new(&analyzer, &cache);

        let result = grouper.group(&photos(&["a.jpg", "b.jpg", "c.jpg"])).unwrap();

        assert_eq!(result.group_of(&"c.jpg".into()), Some(0));
        assert_eq!(names(result.group(1).unwrap()), vec!["b.jpg"]);
    }

    #[test]
    fn scan_stops_at_first_matching_member() {
        let analyzer = strangers()
            .with_distance("a.jpg", "b.jpg", 0.1)
            .with_distance("c.jpg", "a.jpg", 0.1);
        let cache = FaceCountCache::new();
        let grouper = PhotoGrouper::new(&analyzer, &cache);

        grouper.group(&photos(&["a.jpg", "b.jpg", "c.jpg"])).unwrap();

        // b vs a, then c vs a; c is never compared with b
        assert_eq!(analyzer.calls().comparisons, 2);
    }

    #[test]
    fn distance_equal_to_threshold_matches() {
        let analyzer = strangers()
            .with_distance("a.jpg", "b.jpg", 0.6)
            .with_distance("a.jpg", "c.jpg", 0.6 + 1e-9);
        let cache = FaceCountCache::new();
        let grouper = PhotoGrouper::new(&analyzer, &cache);

        let result = grouper.group(&photos(&["a.jpg", "b.jpg", "c.jpg"])).unwrap();

        assert_eq!(result.group_of(&"b.jpg".into()), Some(0));
        assert_ne!(result.group_of(&"c.jpg".into()), Some(0));
    }

    #[test]
    fn family_photo_at_threshold_bridges_groups() {
        let analyzer = strangers()
            .with_faces("fam.jpg", 2)
            .with_faces("fam2.jpg", 3)
            .with_distance("fam.jpg", "a.jpg", 0.6)
            .with_distance("fam.jpg", "b.jpg", 0.6)
            .with_distance("fam2.jpg", "c.jpg", 0.6 + 1e-9);
        let cache = FaceCountCache::new();
        let grouper = PhotoGrouper::new(&analyzer, &cache);

        let result = grouper
            .group(&photos(&["a.jpg", "b.jpg", "c.jpg", "fam.jpg", "fam2.jpg"]))
            .unwrap();

        assert_eq!(names(result.group(0).unwrap()), vec!["a.jpg", "fam.jpg", "b.jpg"]);
        assert!(result.group(1).is_none());
        assert_eq!(result.group_of(&"c.jpg".into()), Some(2));
        assert_eq!(result.group_of(&"fam2.jpg".into()), Some(3));
        assert_eq!(result.total_groups(), 3);
    }

    #[test]
    fn custom_threshold_is_used() {
        let analyzer = strangers().with_distance("a.jpg", "b.jpg", 0.3);
        let cache = FaceCountCache::new();
        let grouper = PhotoGrouper::new(&analyzer, &cache)
            .with_strategy(ThresholdStrategy::new(0.25).unwrap());

        let result = grouper.group(&photos(&["a.jpg", "b.jpg"])).unwrap();

        assert_eq!(result.total_groups(), 2);
    }

    #[test]
    fn family_photo_bridges_two_individual_groups() {
        let analyzer = ManifestAnalyzer::new()
            .with_faces("ind1.jpg", 1)
            .with_faces("ind2.jpg", 1)
            .with_faces("fam1.jpg", 3)
            .with_distance("ind1.jpg", "ind2.jpg", 0.8)
            .with_distance("fam1.jpg", "ind1.jpg", 0.5)
            .with_distance("fam1.jpg", "ind2.jpg", 0.4);
        let cache = FaceCountCache::new();
        let grouper = PhotoGrouper::new(&analyzer, &cache);

        let result = grouper
            .group(&photos(&["ind1.jpg", "ind2.jpg", "fam1.jpg"]))
            .unwrap();

        assert_eq!(result.total_groups(), 1);
        let group = result.group(0).unwrap();
        assert_eq!(names(group), vec!["ind1.jpg", "fam1.jpg", "ind2.jpg"]);
        assert!(result.group(1).is_none());
    }

    #[test]
    fn retired_id_is_not_reused_for_new_group() {
        let analyzer = ManifestAnalyzer::new()
            .with_faces("a.jpg", 1)
            .with_faces("b.jpg", 1)
            .with_faces("fam1.jpg", 2)
            .with_faces("fam2.jpg", 2)
            .with_default_distance(0.9)
            .with_distance("fam1.jpg", "a.jpg", 0.3)
            .with_distance("fam1.jpg", "b.jpg", 0.3);
        let cache = FaceCountCache::new();
        let grouper = PhotoGrouper::new(&analyzer, &cache);

        let result = grouper
            .group(&photos(&["a.jpg", "b.jpg", "fam1.jpg", "fam2.jpg"]))
            .unwrap();

        let ids: Vec<GroupId> = result.groups.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![0, 2]);
        assert_eq!(names(result.group(2).unwrap()), vec!["fam2.jpg"]);
    }

    #[test]
    fn family_photo_within_one_group_just_joins() {
        let analyzer = ManifestAnalyzer::new()
            .with_faces("a.jpg", 1)
            .with_faces("b.jpg", 1)
            .with_faces("fam.jpg", 2)
            .with_default_distance(0.2);
        let cache = FaceCountCache::new();
        let grouper = PhotoGrouper::new(&analyzer, &cache);

        let result = grouper.group(&photos(&["fam.jpg", "a.jpg", "b.jpg"])).unwrap();

        assert_eq!(result.total_groups(), 1);
        assert_eq!(names(result.group(0).unwrap()), vec!["a.jpg", "b.jpg", "fam.jpg"]);
    }

    #[test]
    fn family_photos_are_never_compared_with_each_other() {
        let analyzer = ManifestAnalyzer::new()
            .with_faces("fam1.jpg", 2)
            .with_faces("fam2.jpg", 4)
            .with_default_distance(0.0);
        let cache = FaceCountCache::new();
        let grouper = PhotoGrouper::new(&analyzer, &cache);

        let result = grouper.group(&photos(&["fam1.jpg", "fam2.jpg"])).unwrap();

        assert_eq!(result.total_groups(), 2);
        assert_eq!(analyzer.calls().comparisons, 0);
    }

    #[test]
    fn later_family_photo_merges_into_already_merged_group() {
        let analyzer = ManifestAnalyzer::new()
            .with_faces("a.jpg", 1)
            .with_faces("b.jpg", 1)
            .with_faces("c.jpg", 1)
            .with_faces("fam1.jpg", 2)
            .with_faces("fam2.jpg", 2)
            .with_default_distance(0.9)
            .with_distance("fam1.jpg", "a.jpg", 0.3)
            .with_distance("fam1.jpg", "b.jpg", 0.3)
            .with_distance("fam2.jpg", "b.jpg", 0.3)
            .with_distance("fam2.jpg", "c.jpg", 0.3);
        let cache = FaceCountCache::new();
        let grouper = PhotoGrouper::new(&analyzer, &cache);

        let result = grouper
            .group(&photos(&["a.jpg", "b.jpg", "c.jpg", "fam1.jpg", "fam2.jpg"]))
            .unwrap();

        assert_eq!(result.total_groups(), 1);
        assert_eq!(
            sorted_names(result.group(0).unwrap()),
            vec!["a.jpg", "b.jpg", "c.jpg", "fam1.jpg", "fam2.jpg"]
        );
    }

    #[test]
    fn photos_without_faces_are_not_grouped() {
        let analyzer = strangers().with_faces("landscape.jpg", 0);
        let cache = FaceCountCache::new();
        let grouper = PhotoGrouper::new(&analyzer, &cache);

        let result = grouper.group(&photos(&["landscape.jpg", "a.jpg"])).unwrap();

        assert_eq!(result.total_groups(), 1);
        assert_eq!(result.group_of(&"landscape.jpg".into()), None);
        assert_eq!(result.photos_without_faces, photos(&["landscape.jpg"]));
        assert_eq!(result.kind_of(&"landscape.jpg".into()), Some(PhotoKind::Empty));
    }

    #[test]
    fn failed_detection_degrades_without_error() {
        let analyzer = ManifestAnalyzer::new();
        let cache = FaceCountCache::new();
        let grouper = PhotoGrouper::new(&analyzer, &cache);
        let broken = Photo::from("broken.jpg");

        let result = grouper.group(&[broken.clone()]).unwrap();

        assert!(!grouper.is_family_photo(&broken));
        assert_eq!(result.total_groups(), 0);
        assert_eq!(result.photos_without_faces, vec![broken]);
        assert_eq!(analyzer.calls().detections, 1);
    }

    #[test]
    fn failed_comparison_never_matches() {
        // No distances and no default: every comparison fails
        let analyzer = ManifestAnalyzer::new()
            .with_faces("a.jpg", 1)
            .with_faces("b.jpg", 1)
            .with_faces("fam.jpg", 2);
        let cache = FaceCountCache::new();
        let grouper = PhotoGrouper::new(&analyzer, &cache);

        let result = grouper.group(&photos(&["a.jpg", "b.jpg", "fam.jpg"])).unwrap();

        assert_eq!(result.total_groups(), 3);
    }

    #[test]
    fn repeated_photo_is_grouped_once() {
        let analyzer = strangers();
        let cache = FaceCountCache::new();
        let grouper = PhotoGrouper::new(&analyzer, &cache);

        let result = grouper.group(&photos(&["a.jpg", "a.jpg", "b.jpg"])).unwrap();

        assert_eq!(result.total_photos, 3);
        assert_eq!(result.total_groups(), 2);
        assert_eq!(names(result.group(0).unwrap()), vec!["a.jpg"]);
    }

    #[test]
    fn every_photo_lands_in_exactly_one_group() {
        let analyzer = ManifestAnalyzer::new()
            .with_faces("a.jpg", 1)
            .with_faces("b.jpg", 1)
            .with_faces("c.jpg", 1)
            .with_faces("d.jpg", 1)
            .with_faces("fam1.jpg", 2)
            .with_faces("fam2.jpg", 3)
            .with_faces("fam3.jpg", 2)
            .with_default_distance(0.9)
            .with_distance("a.jpg", "c.jpg", 0.2)
            .with_distance("fam1.jpg", "b.jpg", 0.4)
            .with_distance("fam1.jpg", "c.jpg", 0.4)
            .with_distance("fam2.jpg", "d.jpg", 0.1);
        let cache = FaceCountCache::new();
        let grouper = PhotoGrouper::new(&analyzer, &cache);
        let input = photos(&["a.jpg", "fam1.jpg", "b.jpg", "fam2.jpg", "c.jpg", "d.jpg", "fam3.jpg"]);

        let result = grouper.group(&input).unwrap();

        for photo in &input {
            let holders = result.groups.iter().filter(|g| g.contains(photo)).count();
            assert_eq!(holders, 1, "{} should be in exactly one group", photo);
        }
        // {a, c, b, fam1}, {d, fam2}, {fam3}
        assert_eq!(result.total_groups(), 3);
    }

    #[test]
    fn cache_is_shared_across_runs() {
        let analyzer = strangers();
        let cache = FaceCountCache::new();
        let grouper = PhotoGrouper::new(&analyzer, &cache);

        grouper.group(&photos(&["a.jpg", "b.jpg"])).unwrap();
        grouper.group(&photos(&["a.jpg", "b.jpg"])).unwrap();

        assert_eq!(analyzer.calls().detections, 2);
    }

    #[test]
    fn emits_lifecycle_and_merge_events() {
        let analyzer = ManifestAnalyzer::new()
            .with_faces("ind1.jpg", 1)
            .with_faces("ind2.jpg", 1)
            .with_faces("fam1.jpg", 2)
            .with_distance("ind1.jpg", "ind2.jpg", 0.8)
            .with_distance("fam1.jpg", "ind1.jpg", 0.5)
            .with_distance("fam1.jpg", "ind2.jpg", 0.4);
        let cache = FaceCountCache::new();
        let grouper = PhotoGrouper::new(&analyzer, &cache);
        let (sender, receiver) = EventChannel::new();

        grouper
            .group_with_events(&photos(&["ind1.jpg", "ind2.jpg", "fam1.jpg"]), &sender)
            .unwrap();
        drop(sender);
        let events: Vec<Event> = receiver.iter().collect();

        assert_eq!(
            events.first(),
            Some(&Event::Grouping(GroupingEvent::Started { total_photos: 3 }))
        );
        assert!(events.contains(&Event::Group(GroupEvent::Merged {
            target: 0,
            retired: vec![1],
            family_photo: "fam1.jpg".into(),
        })));
        match events.last() {
            Some(Event::Grouping(GroupingEvent::Completed(summary))) => {
                assert_eq!(summary.total_groups, 1);
                assert_eq!(summary.family_photos, 1);
            }
            other => panic!("expected Completed, got {:?}", other),
        }
    }
}
