//! Dependent fetch orchestration for the profile screen.
//!
//! Three sources feed the screen: the profile, the school list and the club
//! list of the profile's school. Profile and schools resolve independently;
//! clubs are resolved only after the profile has settled, keyed by its
//! `school_id`. Every source runs under its own [`Scope`] so that a newer
//! invocation (or [`ProfileOrchestrator::teardown`]) makes older results
//! unwritable. A result is also dropped when the login state changed while
//! its request was in flight.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::api::Backend;
use crate::session::AuthContext;

use super::liveness::Scope;
use super::state::{ClubsKey, ProfileScreenState, Resolution};
use super::view::{PROFILE_FETCH_FAILED, ProfileView, club_dependency};

pub struct ProfileOrchestrator<B, A> {
    backend: Arc<B>,
    auth: Arc<A>,
    state: Mutex<ProfileScreenState>,
    profile_scope: Scope,
    schools_scope: Scope,
    clubs_scope: Scope,
}

impl<B: Backend, A: AuthContext> ProfileOrchestrator<B, A> {
    pub fn new(backend: Arc<B>, auth: Arc<A>) -> Self {
        Self {
            backend,
            auth,
            state: Mutex::new(ProfileScreenState::default()),
            profile_scope: Scope::new(),
            schools_scope: Scope::new(),
            clubs_scope: Scope::new(),
        }
    }

    /// Copy of the current raw state
    pub fn snapshot(&self) -> ProfileScreenState {
        self.state.lock().clone()
    }

    pub fn view(&self) -> ProfileView {
        self.state.lock().view()
    }

    /// Re-resolve for a new trigger (e.g. the tab was re-activated).
    ///
    /// The profile is always fetched again; the school list only when the
    /// login state differs from its last resolution.
    pub async fn refresh(&self, trigger: u64) {
        tokio::join!(self.resolve_profile(trigger), self.sync_schools());
    }

    /// Re-resolve after the login state changed, keeping the current trigger.
    pub async fn sync_session(&self) {
        let trigger = self.state.lock().trigger;
        self.refresh(trigger).await;
    }

    /// Stop all in-flight work; late results are dropped.
    pub fn teardown(&self) {
        self.profile_scope.teardown();
        self.schools_scope.teardown();
        self.clubs_scope.teardown();
        let mut state = self.state.lock();
        state.clubs_key = None;
        state.schools_key = None;
    }

    pub async fn resolve_profile(&self, trigger: u64) {
        let liveness = self.profile_scope.begin();
        let logged_in = self.auth.is_logged_in();
        self.state.lock().trigger = trigger;

        if !logged_in {
            self.state.lock().profile = Resolution::Ready(None);
            self.sync_clubs(None).await;
            return;
        }

        self.state.lock().profile = Resolution::Loading;
        let headers = self.auth.auth_header();
        let result = self.backend.fetch_profile(&headers).await;

        if !liveness.is_alive() || self.auth.is_logged_in() != logged_in {
            tracing::debug!(
                epoch = liveness.epoch(),
                trigger,
                "discarding stale profile result"
            );
            return;
        }

        let school_id = {
            let mut state = self.state.lock();
            state.profile = match result {
                Ok(profile) => Resolution::Ready(Some(profile)),
                Err(e) => {
                    tracing::error!("프로필 조회 실패: {e}");
                    let message = e.to_string();
                    Resolution::Failed(if message.is_empty() {
                        PROFILE_FETCH_FAILED.to_string()
                    } else {
                        message
                    })
                }
            };
            club_dependency(&state.profile)
        };

        self.sync_clubs(school_id).await;
    }

    pub async fn resolve_schools(&self) {
        let liveness = self.schools_scope.begin();
        let logged_in = self.auth.is_logged_in();

        {
            let mut state = self.state.lock();
            state.schools_key = Some(logged_in);
            if !logged_in {
                state.schools = Resolution::Ready(Vec::new());
                return;
            }
            state.schools = Resolution::Loading;
        }

        let result = self.backend.fetch_schools().await;

        if !liveness.is_alive() || self.auth.is_logged_in() != logged_in {
            tracing::debug!(epoch = liveness.epoch(), "discarding stale school list");
            return;
        }

        let schools = result.unwrap_or_else(|e| {
            tracing::warn!("Failed to fetch schools, continuing without names: {e}");
            Vec::new()
        });
        self.state.lock().schools = Resolution::Ready(schools);
    }

    /// Resolve the club list for `school_id`.
    ///
    /// Without a login or a school the list is reset and nothing is fetched.
    pub async fn resolve_clubs(&self, school_id: Option<u64>) {
        let liveness = self.clubs_scope.begin();
        let logged_in = self.auth.is_logged_in();
        let school_id = school_id.filter(|id| *id != 0);

        let target = {
            let mut state = self.state.lock();
            state.clubs_key = Some(ClubsKey {
                logged_in,
                school_id,
            });
            match school_id {
                Some(id) if logged_in => {
                    state.clubs = Resolution::Loading;
                    id
                }
                _ => {
                    state.clubs = Resolution::Ready(Vec::new());
                    return;
                }
            }
        };

        let result = self.backend.fetch_clubs(target).await;

        if !liveness.is_alive() || !self.auth.is_logged_in() {
            tracing::debug!(
                epoch = liveness.epoch(),
                school_id = target,
                "discarding stale club list"
            );
            return;
        }

        let clubs = result.unwrap_or_else(|e| {
            tracing::warn!("Failed to fetch clubs for school {target}: {e}");
            Vec::new()
        });
        self.state.lock().clubs = Resolution::Ready(clubs);
    }

    /// Re-run the school resolution only if the login state changed.
    async fn sync_schools(&self) {
        let logged_in = self.auth.is_logged_in();
        if self.state.lock().schools_key == Some(logged_in) {
            return;
        }
        self.resolve_schools().await;
    }

    /// Re-run the club resolution only if its inputs changed.
    async fn sync_clubs(&self, school_id: Option<u64>) {
        let key = ClubsKey {
            logged_in: self.auth.is_logged_in(),
            school_id,
        };
        if self.state.lock().clubs_key == Some(key) {
            return;
        }
        self.resolve_clubs(school_id).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Club, Profile, Role, School};
    use crate::test_support::{Call, FakeAuth, FakeBackend, api_error};

    fn profile(name: &str, school_id: Option<u64>, club_id: Option<u64>) -> Profile {
        Profile {
            id: 1,
            email: format!("{name}@replay.kr"),
            name: name.to_string(),
            role: Role::User,
            school_id,
            club_id,
        }
    }

    fn school(id: u64, name: &str) -> School {
        School {
            id,
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn club(id: u64, school_id: u64, name: &str) -> Club {
        Club {
            id,
            school_id,
            name: name.to_string(),
            ..Default::default()
        }
    }

    fn setup(logged_in: bool) -> (Arc<FakeBackend>, Arc<FakeAuth>) {
        (Arc::new(FakeBackend::new()), Arc::new(FakeAuth::new(logged_in)))
    }

    #[tokio::test]
    async fn test_logged_out_resolves_empty_without_network() {
        let (backend, auth) = setup(false);
        let orch = ProfileOrchestrator::new(backend.clone(), auth);

        orch.refresh(1).await;

        let state = orch.snapshot();
        assert_eq!(state.profile, Resolution::Ready(None));
        assert_eq!(state.schools, Resolution::Ready(vec![]));
        assert_eq!(state.clubs, Resolution::Ready(vec![]));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_full_resolution_builds_meta_line() {
        let (backend, auth) = setup(true);
        backend.push_profile(Ok(profile("김배우", Some(5), Some(9))));
        backend.push_schools(Ok(vec![school(5, "연세대학교")]));
        backend.push_clubs(Ok(vec![club(9, 5, "극단")]));
        let orch = ProfileOrchestrator::new(backend.clone(), auth);

        orch.refresh(1).await;

        let view = orch.view();
        assert_eq!(view.meta_line, "연세대학교 극단");
        assert_eq!(view.display_name, "김배우");
        assert!(backend.calls().contains(&Call::Clubs(5)));
    }

    #[tokio::test]
    async fn test_stale_profile_is_discarded() {
        let (backend, auth) = setup(true);
        let release_first = backend.push_profile_gated(Ok(profile("old", Some(1), None)));
        backend.push_profile(Ok(profile("new", Some(2), None)));
        backend.push_clubs(Ok(vec![club(3, 2, "새 동아리")]));
        let orch = ProfileOrchestrator::new(backend.clone(), auth);

        tokio::join!(orch.resolve_profile(1), async {
            orch.resolve_profile(2).await;
            release_first.send(()).unwrap();
        });

        let state = orch.snapshot();
        let current = state.profile.ready().cloned().flatten().unwrap();
        assert_eq!(current.name, "new");
        assert_eq!(state.trigger, 2);
        // The superseded profile never reached the club resolution
        assert_eq!(
            backend.calls(),
            vec![Call::Profile, Call::Profile, Call::Clubs(2)]
        );
    }

    #[tokio::test]
    async fn test_teardown_discards_in_flight_profile() {
        let (backend, auth) = setup(true);
        let release = backend.push_profile_gated(Ok(profile("late", Some(1), None)));
        let orch = ProfileOrchestrator::new(backend.clone(), auth);

        tokio::join!(orch.resolve_profile(1), async {
            orch.teardown();
            release.send(()).unwrap();
        });

        assert_eq!(orch.snapshot().profile, Resolution::Loading);
        assert_eq!(backend.calls(), vec![Call::Profile]);
    }

    #[tokio::test]
    async fn test_clubs_wait_for_school_id() {
        let (backend, auth) = setup(true);
        backend.push_profile(Ok(profile("무소속", None, None)));
        let orch = ProfileOrchestrator::new(backend.clone(), auth);

        orch.resolve_profile(1).await;

        assert_eq!(orch.snapshot().clubs, Resolution::Ready(vec![]));
        assert_eq!(backend.calls(), vec![Call::Profile]);
    }

    #[tokio::test]
    async fn test_clubs_switch_school_discards_previous() {
        let (backend, auth) = setup(true);
        let release_a = backend.push_clubs_gated(Ok(vec![club(1, 10, "A 동아리")]));
        backend.push_clubs(Ok(vec![club(2, 20, "B 동아리")]));
        let orch = ProfileOrchestrator::new(backend.clone(), auth);

        tokio::join!(orch.resolve_clubs(Some(10)), async {
            orch.resolve_clubs(Some(20)).await;
            release_a.send(()).unwrap();
        });

        let state = orch.snapshot();
        assert_eq!(state.clubs, Resolution::Ready(vec![club(2, 20, "B 동아리")]));
        assert_eq!(backend.calls(), vec![Call::Clubs(10), Call::Clubs(20)]);
    }

    #[tokio::test]
    async fn test_school_change_refetches_clubs_once() {
        let (backend, auth) = setup(true);
        backend.push_profile(Ok(profile("a", Some(10), None)));
        backend.push_clubs(Ok(vec![club(1, 10, "A")]));
        backend.push_profile(Ok(profile("a", Some(20), None)));
        backend.push_clubs(Ok(vec![club(2, 20, "B")]));
        backend.push_profile(Ok(profile("a", Some(20), None)));
        let orch = ProfileOrchestrator::new(backend.clone(), auth);

        orch.resolve_profile(1).await;
        orch.resolve_profile(2).await;
        // Same school again: the club list is still valid
        orch.resolve_profile(3).await;

        assert_eq!(
            backend.calls(),
            vec![
                Call::Profile,
                Call::Clubs(10),
                Call::Profile,
                Call::Clubs(20),
                Call::Profile,
            ]
        );
        assert_eq!(orch.snapshot().clubs.items()[0].name, "B");
    }

    #[tokio::test]
    async fn test_profile_failure_is_visible_and_clears_clubs() {
        let (backend, auth) = setup(true);
        backend.push_profile(Ok(profile("a", Some(10), None)));
        backend.push_clubs(Ok(vec![club(1, 10, "A")]));
        backend.push_profile(Err(api_error(500, "PROFILE_500:down")));
        let orch = ProfileOrchestrator::new(backend.clone(), auth.clone());

        orch.resolve_profile(1).await;
        orch.resolve_profile(2).await;

        let state = orch.snapshot();
        assert_eq!(state.profile.error(), Some("PROFILE_500:down"));
        assert_eq!(state.clubs, Resolution::Ready(vec![]));
        assert_eq!(orch.view().error.as_deref(), Some("PROFILE_500:down"));
        // Only profile data is affected; the session stays
        assert!(auth.is_logged_in());
    }

    #[tokio::test]
    async fn test_list_failures_degrade_silently() {
        let (backend, auth) = setup(true);
        backend.push_profile(Ok(profile("a", Some(5), Some(9))));
        backend.push_schools(Err(api_error(503, "SCHOOLS_503:")));
        backend.push_clubs(Err(api_error(404, "CLUBS_404:")));
        let orch = ProfileOrchestrator::new(backend.clone(), auth);

        orch.refresh(1).await;

        let state = orch.snapshot();
        assert_eq!(state.schools, Resolution::Ready(vec![]));
        assert_eq!(state.clubs, Resolution::Ready(vec![]));
        let view = orch.view();
        assert!(view.error.is_none());
        assert_eq!(view.meta_line, "");
    }

    #[tokio::test]
    async fn test_logout_then_sync_resets_dependent_state() {
        let (backend, auth) = setup(true);
        backend.push_profile(Ok(profile("a", Some(5), Some(9))));
        backend.push_schools(Ok(vec![school(5, "연세대학교")]));
        backend.push_clubs(Ok(vec![club(9, 5, "극단")]));
        let orch = ProfileOrchestrator::new(backend.clone(), auth.clone());
        orch.refresh(7).await;

        auth.set_logged_in(false);
        orch.sync_session().await;

        let state = orch.snapshot();
        assert_eq!(state.trigger, 7);
        assert_eq!(state.profile, Resolution::Ready(None));
        assert_eq!(state.schools, Resolution::Ready(vec![]));
        assert_eq!(state.clubs, Resolution::Ready(vec![]));
        assert_eq!(backend.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_logout_while_profile_in_flight_is_discarded() {
        let (backend, auth) = setup(true);
        let release = backend.push_profile_gated(Ok(profile("stale", Some(5), None)));
        let orch = ProfileOrchestrator::new(backend.clone(), auth.clone());

        tokio::join!(orch.resolve_profile(1), async {
            auth.set_logged_in(false);
            release.send(()).unwrap();
        });

        assert_eq!(orch.snapshot().profile, Resolution::Loading);
        assert_ne!(orch.view().display_name, "stale");
        assert_eq!(backend.calls(), vec![Call::Profile]);
    }

    #[tokio::test]
    async fn test_logout_while_lists_in_flight_is_discarded() {
        let (backend, auth) = setup(true);
        let release_schools = backend.push_schools_gated(Ok(vec![school(5, "연세대학교")]));
        let release_clubs = backend.push_clubs_gated(Ok(vec![club(9, 5, "극단")]));
        let orch = ProfileOrchestrator::new(backend.clone(), auth.clone());

        tokio::join!(orch.resolve_schools(), orch.resolve_clubs(Some(5)), async {
            auth.set_logged_in(false);
            release_schools.send(()).unwrap();
            release_clubs.send(()).unwrap();
        });

        let state = orch.snapshot();
        assert_eq!(state.schools, Resolution::Loading);
        assert_eq!(state.clubs, Resolution::Loading);
    }

    #[tokio::test]
    async fn test_session_sync_drops_late_school_list() {
        let (backend, auth) = setup(true);
        backend.push_profile(Ok(profile("a", None, None)));
        let release = backend.push_schools_gated(Ok(vec![school(5, "연세대학교")]));
        let orch = ProfileOrchestrator::new(backend.clone(), auth.clone());

        tokio::join!(orch.refresh(1), async {
            auth.set_logged_in(false);
            orch.sync_session().await;
            release.send(()).unwrap();
        });

        let state = orch.snapshot();
        assert_eq!(state.schools, Resolution::Ready(vec![]));
        assert_eq!(state.profile, Resolution::Ready(None));
        assert_eq!(backend.calls(), vec![Call::Profile, Call::Schools]);
    }

    #[tokio::test]
    async fn test_session_sync_drops_late_clubs_from_profile() {
        let (backend, auth) = setup(true);
        backend.push_profile(Ok(profile("a", Some(5), Some(9))));
        backend.push_schools(Ok(vec![school(5, "연세대학교")]));
        let release = backend.push_clubs_gated(Ok(vec![club(9, 5, "극단")]));
        let orch = ProfileOrchestrator::new(backend.clone(), auth.clone());

        tokio::join!(orch.refresh(1), async {
            auth.set_logged_in(false);
            orch.sync_session().await;
            release.send(()).unwrap();
        });

        let state = orch.snapshot();
        assert_eq!(state.clubs, Resolution::Ready(vec![]));
        assert_eq!(orch.view().meta_line, "");
        let calls = backend.calls();
        assert_eq!(calls.len(), 3);
        assert!(calls.contains(&Call::Clubs(5)));
    }

    #[tokio::test]
    async fn test_refresh_reuses_schools_for_same_login() {
        let (backend, auth) = setup(true);
        backend.push_profile(Ok(profile("a", None, None)));
        backend.push_schools(Ok(vec![school(5, "연세대학교")]));
        backend.push_profile(Ok(profile("a", None, None)));
        let orch = ProfileOrchestrator::new(backend.clone(), auth);

        orch.refresh(1).await;
        orch.refresh(2).await;

        assert_eq!(
            backend.calls(),
            vec![Call::Profile, Call::Schools, Call::Profile]
        );
        assert_eq!(orch.snapshot().schools.items().len(), 1);
    }
}
