//! Unit and concurrency tests for bs-station.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use bs_core::{Bike, BikeFleet, BikeType, SiteId};

use crate::BikeStation;

// ── Helpers ───────────────────────────────────────────────────────────────────

const A: BikeType = BikeType(0);
const B: BikeType = BikeType(1);
const C: BikeType = BikeType(2);

/// Long enough for a blocked thread to have reached its wait.
const SETTLE: Duration = Duration::from_millis(100);
/// Upper bound for "returns promptly".
const PROMPT: Duration = Duration::from_secs(5);

fn station(capacity: usize) -> BikeStation {
    BikeStation::new(SiteId(1), capacity, 3)
}

fn bikes(fleet: &mut BikeFleet, kinds: &[BikeType]) -> Vec<Bike> {
    kinds.iter().map(|&k| fleet.mint(k).unwrap()).collect()
}

/// Run `f` on a new thread and report its result through a channel so the
/// test can check whether it finished (and when).
fn spawn_reporting<T, F>(f: F) -> mpsc::Receiver<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(f());
    });
    rx
}

// ── Blocking put/get ──────────────────────────────────────────────────────────

#[cfg(test)]
mod blocking_tests {
    use super::*;

    #[test]
    fn fifo_within_one_type() {
        let st = station(4);
        let mut fleet = BikeFleet::new(3);
        let b1 = fleet.mint(A).unwrap();
        let b2 = fleet.mint(A).unwrap();
        let (id1, id2) = (b1.id(), b2.id());
        st.put_bike(b1).unwrap();
        st.put_bike(b2).unwrap();
        assert_eq!(st.get_bike(A).unwrap().id(), id1);
        assert_eq!(st.get_bike(A).unwrap().id(), id2);
    }

    #[test]
    fn get_returns_requested_type() {
        let st = station(4);
        let mut fleet = BikeFleet::new(3);
        for b in bikes(&mut fleet, &[A, B, C]) {
            st.put_bike(b).unwrap();
        }
        assert_eq!(st.get_bike(B).unwrap().kind(), B);
        assert_eq!(st.count_bikes_of_type(B), 0);
        assert_eq!(st.count_bikes_of_type(A), 1);
        assert_eq!(st.total_bikes(), 2);
    }

    #[test]
    fn third_put_blocks_until_a_get() {
        let st = Arc::new(station(2));
        let mut fleet = BikeFleet::new(3);
        let mut three = bikes(&mut fleet, &[A, A, A]);
        let third = three.pop().unwrap();
        for b in three {
            st.put_bike(b).unwrap();
        }

        let rx = spawn_reporting({
            let st = Arc::clone(&st);
            move || st.put_bike(third).is_ok()
        });
        assert!(rx.recv_timeout(SETTLE).is_err(), "put on a full station must block");

        st.get_bike(A).unwrap();
        assert!(rx.recv_timeout(PROMPT).unwrap());
        assert_eq!(st.total_bikes(), 2);
    }

    #[test]
    fn removal_of_other_type_frees_slot_for_waiting_put() {
        let st = Arc::new(station(1));
        let mut fleet = BikeFleet::new(3);
        st.put_bike(fleet.mint(B).unwrap()).unwrap();

        let a = fleet.mint(A).unwrap();
        let rx = spawn_reporting({
            let st = Arc::clone(&st);
            move || st.put_bike(a).is_ok()
        });
        assert!(rx.recv_timeout(SETTLE).is_err());

        // Only type B is ever removed; the type-A inserter must still wake.
        st.get_bike(B).unwrap();
        assert!(rx.recv_timeout(PROMPT).unwrap());
        assert_eq!(st.count_bikes_of_type(A), 1);
    }

    #[test]
    fn get_waits_for_its_own_type() {
        let st = Arc::new(station(4));
        let mut fleet = BikeFleet::new(3);

        let rx = spawn_reporting({
            let st = Arc::clone(&st);
            move || st.get_bike(A).map(|b| b.kind())
        });
        assert!(rx.recv_timeout(SETTLE).is_err());

        st.put_bike(fleet.mint(B).unwrap()).unwrap();
        assert!(rx.recv_timeout(SETTLE).is_err(), "a type-B arrival must not satisfy a type-A get");

        st.put_bike(fleet.mint(A).unwrap()).unwrap();
        assert_eq!(rx.recv_timeout(PROMPT).unwrap(), Ok(A));
        assert_eq!(st.count_bikes_of_type(B), 1);
    }

    #[test]
    fn capacity_holds_under_contention() {
        let capacity = 3;
        let st = Arc::new(station(capacity));
        let rounds = 200;
        let workers = 4;

        let mut handles = Vec::new();
        for w in 0..workers {
            let st = Arc::clone(&st);
            let kind = BikeType((w % 3) as u8);
            handles.push(thread::spawn(move || {
                let mut fleet = BikeFleet::new(3);
                for _ in 0..rounds {
                    st.put_bike(fleet.mint(kind).unwrap()).unwrap();
                    assert!(st.total_bikes() <= capacity);
                    let bike = st.get_bike(kind).unwrap();
                    assert_eq!(bike.kind(), kind);
                }
            }));
        }
        for handle in handles {
            handle.join().expect("worker panicked");
        }
        assert_eq!(st.total_bikes(), 0);
    }

    #[test]
    #[should_panic(expected = "is not handled")]
    fn unknown_kind_panics() {
        let st = BikeStation::new(SiteId(1), 2, 2);
        st.put_bike(Bike::new(bs_core::BikeId(0), C)).unwrap();
    }
}

// ── Batch operations ──────────────────────────────────────────────────────────

#[cfg(test)]
mod batch_tests {
    use super::*;

    #[test]
    fn add_bikes_returns_rejected_suffix() {
        let st = station(4);
        let mut fleet = BikeFleet::new(3);
        st.put_bike(fleet.mint(A).unwrap()).unwrap();

        let offered = bikes(&mut fleet, &[B, C, A, B, C]);
        let ids: Vec<_> = offered.iter().map(Bike::id).collect();
        let rejected = st.add_bikes(offered);

        assert_eq!(st.total_bikes(), 4);
        let rejected_ids: Vec<_> = rejected.iter().map(Bike::id).collect();
        assert_eq!(rejected_ids, ids[3..].to_vec());
    }

    #[test]
    fn add_bikes_total_is_min_of_capacity_and_sum() {
        for (before, offered) in [(0, 2), (1, 3), (4, 2), (6, 1), (0, 0)] {
            let st = station(6);
            let mut fleet = BikeFleet::new(3);
            for _ in 0..before {
                st.put_bike(fleet.mint(A).unwrap()).unwrap();
            }
            let batch: Vec<Bike> = (0..offered).map(|_| fleet.mint(B).unwrap()).collect();
            let rejected = st.add_bikes(batch);
            assert_eq!(st.total_bikes(), (before + offered).min(6));
            assert_eq!(rejected.len(), (before + offered).saturating_sub(6));
        }
    }

    #[test]
    fn add_bikes_wakes_waiting_getter() {
        let st = Arc::new(station(4));
        let mut fleet = BikeFleet::new(3);
        let rx = spawn_reporting({
            let st = Arc::clone(&st);
            move || st.get_bike(C).is_ok()
        });
        assert!(rx.recv_timeout(SETTLE).is_err());
        let rejected = st.add_bikes(bikes(&mut fleet, &[A, C]));
        assert!(rejected.is_empty());
        assert!(rx.recv_timeout(PROMPT).unwrap());
    }

    #[test]
    fn get_bikes_drains_types_in_order() {
        let st = station(6);
        let mut fleet = BikeFleet::new(3);
        let offered = bikes(&mut fleet, &[C, A, B, A, C]);
        assert!(st.add_bikes(offered).is_empty());

        let taken = st.get_bikes(4);
        let kinds: Vec<_> = taken.iter().map(Bike::kind).collect();
        assert_eq!(kinds, vec![A, A, B, C]);
        // Within type A, arrival order is kept: ids 1 then 3.
        assert_eq!(taken[0].id(), bs_core::BikeId(1));
        assert_eq!(taken[1].id(), bs_core::BikeId(3));
        assert_eq!(st.total_bikes(), 1);
        assert_eq!(st.count_bikes_of_type(C), 1);
    }

    #[test]
    fn get_bikes_partial_result_does_not_block() {
        let st = station(6);
        let mut fleet = BikeFleet::new(3);
        assert!(st.add_bikes(bikes(&mut fleet, &[B, B])).is_empty());
        assert_eq!(st.get_bikes(5).len(), 2);
        assert!(st.get_bikes(5).is_empty());
        assert!(station(3).get_bikes(0).is_empty());
    }

    #[test]
    fn get_bikes_frees_slots_for_waiting_put() {
        let st = Arc::new(station(2));
        let mut fleet = BikeFleet::new(3);
        assert!(st.add_bikes(bikes(&mut fleet, &[A, A])).is_empty());
        let b = fleet.mint(B).unwrap();
        let rx = spawn_reporting({
            let st = Arc::clone(&st);
            move || st.put_bike(b).is_ok()
        });
        assert!(rx.recv_timeout(SETTLE).is_err());
        assert_eq!(st.get_bikes(2).len(), 2);
        assert!(rx.recv_timeout(PROMPT).unwrap());
        assert_eq!(st.counts_by_type(), vec![0, 1, 0]);
    }
}

// ── Shutdown ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod shutdown_tests {
    use super::*;

    #[test]
    fn releases_blocked_getters_and_putters() {
        let empty = Arc::new(station(2));
        let full = Arc::new(station(1));
        let mut fleet = BikeFleet::new(3);
        full.put_bike(fleet.mint(A).unwrap()).unwrap();

        let getters: Vec<_> = [A, B, C]
            .into_iter()
            .map(|kind| {
                let st = Arc::clone(&empty);
                spawn_reporting(move || st.get_bike(kind).is_err())
            })
            .collect();
        let blocked = fleet.mint(B).unwrap();
        let blocked_id = blocked.id();
        let putter = spawn_reporting({
            let st = Arc::clone(&full);
            move || st.put_bike(blocked).map_err(|refused| refused.into_bike().id())
        });
        thread::sleep(SETTLE);

        empty.shutdown();
        full.shutdown();

        for rx in getters {
            assert!(rx.recv_timeout(PROMPT).unwrap(), "getter must see the shutdown");
        }
        assert_eq!(putter.recv_timeout(PROMPT).unwrap(), Err(blocked_id));
        assert_eq!(full.total_bikes(), 1);
    }

    #[test]
    fn later_calls_return_immediately() {
        let st = station(2);
        let mut fleet = BikeFleet::new(3);
        st.put_bike(fleet.mint(A).unwrap()).unwrap();
        st.shutdown();
        st.shutdown();
        assert!(st.is_shutting_down());

        // Even with a bike of the right type available, and room to dock.
        assert!(st.get_bike(A).is_err());
        assert!(st.put_bike(fleet.mint(A).unwrap()).is_err());
        assert_eq!(st.total_bikes(), 1);
    }

    #[test]
    fn batch_calls_keep_working_after_shutdown() {
        let st = station(2);
        let mut fleet = BikeFleet::new(3);
        st.shutdown();
        assert!(st.add_bikes(bikes(&mut fleet, &[A, B, C])).len() == 1);
        assert_eq!(st.get_bikes(5).len(), 2);
    }

    #[test]
    fn concurrent_shutdown_with_busy_agents() {
        let st = Arc::new(station(2));
        let mut handles = Vec::new();
        for w in 0..6u8 {
            let st = Arc::clone(&st);
            handles.push(thread::spawn(move || {
                let mut fleet = BikeFleet::new(3);
                let kind = BikeType(w % 3);
                loop {
                    if w % 2 == 0 {
                        if st.put_bike(fleet.mint(kind).unwrap()).is_err() {
                            break;
                        }
                    } else if st.get_bike(kind).is_err() {
                        break;
                    }
                }
            }));
        }
        thread::sleep(Duration::from_millis(50));
        st.shutdown();

        let rx = spawn_reporting(move || {
            for handle in handles {
                handle.join().expect("agent panicked");
            }
        });
        rx.recv_timeout(PROMPT).expect("every agent must exit after shutdown");
        assert!(st.total_bikes() <= 2);
    }
}

// ── Registry ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod registry_tests {
    use bs_core::{BikingConfig, BsError, SimRng};

    use super::*;
    use crate::StationRegistry;

    fn config() -> BikingConfig {
        BikingConfig {
            sites: 4,
            bornes: 5,
            depot_capacity: 8,
            bikes_per_site: 3,
            depot_bikes: 6,
            ..BikingConfig::default()
        }
    }

    #[test]
    fn one_station_per_site() {
        let reg = StationRegistry::new(&config());
        assert_eq!(reg.len(), 4);
        assert_eq!(reg.depot_id(), SiteId::DEPOT);
        assert_eq!(reg.depot().capacity_slots(), 8);
        for (i, st) in reg.iter().enumerate() {
            assert_eq!(st.site(), SiteId(i as u32));
            assert_eq!(st.total_bikes(), 0);
        }
        assert_eq!(reg.get(SiteId(2)).unwrap().capacity_slots(), 5);
        assert!(reg.get(SiteId(4)).is_none());
        assert!(matches!(reg.station(SiteId(9)), Err(BsError::SiteNotFound(SiteId(9)))));
    }

    #[test]
    fn stocked_fills_initial_bikes() {
        let cfg = config();
        let mut fleet = BikeFleet::new(cfg.bike_types);
        let mut rng = SimRng::new(cfg.seed);
        let reg = StationRegistry::stocked(&cfg, &mut fleet, &mut rng);
        assert_eq!(reg.occupancy(), vec![6, 3, 3, 3]);
        assert_eq!(reg.total_bikes(), 15);
        assert_eq!(fleet.minted(), 15);
    }

    #[test]
    fn from_stations_checks_layout() {
        let ok = StationRegistry::from_stations(
            vec![station_at(0), station_at(1)],
            SiteId(0),
        );
        assert!(ok.is_ok());

        let bad_depot = StationRegistry::from_stations(vec![station_at(0)], SiteId(1));
        assert!(matches!(bad_depot, Err(BsError::SiteNotFound(_))));

        let swapped = StationRegistry::from_stations(
            vec![station_at(1), station_at(0)],
            SiteId(0),
        );
        assert!(matches!(swapped, Err(BsError::Config(_))));
    }

    #[test]
    fn shutdown_all_closes_every_station() {
        let reg = StationRegistry::new(&config());
        reg.shutdown_all();
        assert!(reg.iter().all(BikeStation::is_shutting_down));
    }

    fn station_at(i: u32) -> BikeStation {
        BikeStation::new(SiteId(i), 2, 3)
    }
}
