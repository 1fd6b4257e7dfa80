use super::*;
use crate::error::ConfigError;
use crate::locations::LocationKind;
use crate::mapgen::MazeConfig;

fn config(width: i32, height: i32, openness: i32, seed: u64) -> GenerationConfig {
    GenerationConfig {
        maze: MazeConfig { width, height, openness },
        seed,
        ..GenerationConfig::default()
    }
}

/// Three open cells in a row, a hospital on the right end, and a second
/// fully walled row underneath.
fn corridor_session(players: &[(&str, Pos)]) -> Session {
    let mut maze = Maze::new(3, 2).unwrap();
    maze.open_wall(Pos::new(0, 0), Dir::Right).unwrap();
    maze.open_wall(Pos::new(1, 0), Dir::Right).unwrap();
    maze.tag(Pos::new(2, 0), LocationKind::Hospital);
    let players = players
        .iter()
        .enumerate()
        .map(|(index, &(name, pos))| Player {
            name: name.to_string(),
            pos,
            color: PLAYER_PALETTE[index].to_string(),
        })
        .collect();
    let hospital = Location::new(LocationKind::Hospital, vec![Pos::new(2, 0)]);
    Session::from_parts(RandomSource::new(9), maze, players, vec![hospital])
}

fn open_boundary_walls(maze: &Maze, location: &Location) -> usize {
    location
        .cells()
        .iter()
        .flat_map(|&cell| Dir::ALL.into_iter().map(move |dir| (cell, dir)))
        .filter(|&(cell, dir)| {
            maze.neighbor(cell, dir).is_some_and(|next| !location.contains(next))
                && !maze.has_wall(cell, dir)
        })
        .count()
}

#[test]
fn standard_generation_places_each_kind_once() {
    let session = Session::generate(&config(10, 10, 50, 42), &LocationCatalog::standard()).unwrap();
    let kinds: Vec<LocationKind> = session.locations().iter().map(Location::kind).collect();
    assert_eq!(kinds, vec![LocationKind::Hospital, LocationKind::Arsenal]);

    let maze = session.maze();
    assert!(maze.is_fully_connected());
    let mut seen = ReservedSet::new();
    for location in session.locations() {
        assert_eq!(open_boundary_walls(maze, location), 1, "{location:?}");
        for &cell in location.cells() {
            assert!(maze.in_bounds(cell));
            assert!(seen.insert(cell), "cell {cell:?} claimed twice");
            assert_eq!(maze.content(cell), Some(location.kind()));
            assert_eq!(session.location_at(cell), Some(location));
        }
    }
    assert_eq!(
        maze.positions().filter(|&pos| maze.content(pos).is_some()).count(),
        seen.len()
    );
}

#[test]
fn same_config_reproduces_the_same_session() {
    let catalog = LocationCatalog::standard();
    let a = Session::generate(&config(14, 9, 30, 777), &catalog).unwrap();
    let b = Session::generate(&config(14, 9, 30, 777), &catalog).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.fingerprint(), b.fingerprint());

    let c = Session::generate(&config(14, 9, 30, 778), &catalog).unwrap();
    assert_ne!(a.fingerprint(), c.fingerprint());
}

#[test]
fn empty_catalog_yields_a_bare_maze() {
    let session = Session::generate(&config(6, 4, 0, 5), &LocationCatalog::empty()).unwrap();
    assert!(session.locations().is_empty());

    let mut rng = RandomSource::new(5);
    let bare = generate_maze(&MazeConfig { width: 6, height: 4, openness: 0 }, &mut rng).unwrap();
    assert_eq!(session.maze(), &bare);
    assert_eq!(session.rng(), &rng);
}

#[test]
fn tiny_grids_exhaust_the_placement_rounds() {
    let mut tiny = config(1, 1, 0, 3);
    tiny.max_placement_rounds = 5;
    assert_eq!(
        Session::generate(&tiny, &LocationCatalog::standard()),
        Err(GenerationError::PlacementExhausted { kind: LocationKind::Hospital, rounds: 5 })
    );

    tiny.max_placement_rounds = 0;
    assert_eq!(
        Session::generate(&tiny, &LocationCatalog::standard()),
        Err(GenerationError::PlacementExhausted { kind: LocationKind::Hospital, rounds: 1 })
    );
}

#[test]
fn invalid_dimensions_fail_before_any_placement() {
    assert_eq!(
        Session::generate(&config(0, 3, 50, 1), &LocationCatalog::standard()),
        Err(GenerationError::Config(ConfigError::NonPositiveDimensions { width: 0, height: 3 }))
    );
}

#[test]
fn add_player_draws_x_then_y_and_cycles_the_palette() {
    let mut session =
        Session::generate(&config(12, 12, 50, 4), &LocationCatalog::standard()).unwrap();
    for index in 0..12 {
        let mut probe = session.rng().clone();
        let x = probe.below(12) as i32;
        let y = probe.below(12) as i32;

        let name = format!("p{index}");
        session.add_player(&name).unwrap();
        let player = session.player(&name).unwrap();
        assert_eq!(player.pos, Pos::new(x, y));
        assert_eq!(player.color, PLAYER_PALETTE[index % PLAYER_PALETTE.len()]);
        assert_eq!(session.rng(), &probe);
    }
}

#[test]
fn add_player_reports_entering_a_location() {
    let mut session =
        Session::generate(&config(6, 6, 100, 21), &LocationCatalog::standard()).unwrap();
    for index in 0..40 {
        let name = format!("p{index}");
        let events = session.add_player(&name).unwrap();
        let pos = session.player(&name).unwrap().pos;
        let entered: Vec<&Event> =
            events.iter().filter(|event| matches!(event, Event::Entered { .. })).collect();
        match session.location_at(pos) {
            Some(location) => assert_eq!(
                entered,
                vec![&Event::Entered { player: name.clone(), kind: location.kind() }]
            ),
            None => assert!(entered.is_empty()),
        }
    }
}

#[test]
fn player_names_are_validated() {
    let mut session = corridor_session(&[("ann", Pos::new(0, 0))]);
    for bad in ["", "two words", "tab\there"] {
        assert_eq!(
            session.add_player(bad),
            Err(SessionError::InvalidPlayerName(bad.to_string()))
        );
    }
    assert_eq!(session.add_player("ann"), Err(SessionError::DuplicatePlayer("ann".to_string())));
    assert_eq!(session.players().len(), 1);
}

#[test]
fn walking_into_and_out_of_a_location() {
    let mut session = corridor_session(&[("ann", Pos::new(0, 0))]);
    let ann = || "ann".to_string();

    assert_eq!(
        session.move_player("ann", Dir::Right).unwrap(),
        vec![Event::Moved { player: ann(), dir: Dir::Right }]
    );
    assert_eq!(
        session.move_player("ann", Dir::Right).unwrap(),
        vec![
            Event::Entered { player: ann(), kind: LocationKind::Hospital },
            Event::Moved { player: ann(), dir: Dir::Right },
        ]
    );
    assert_eq!(
        session.move_player("ann", Dir::Left).unwrap(),
        vec![
            Event::Left { player: ann(), kind: LocationKind::Hospital },
            Event::Moved { player: ann(), dir: Dir::Left },
        ]
    );
    assert_eq!(session.player("ann").unwrap().pos, Pos::new(1, 0));
}

#[test]
fn bumping_leaves_the_player_in_place() {
    let mut session = corridor_session(&[("ann", Pos::new(0, 0))]);
    assert_eq!(
        session.move_player("ann", Dir::Up).unwrap(),
        vec![Event::HitOuterWall { player: "ann".to_string() }]
    );
    assert_eq!(
        session.move_player("ann", Dir::Down).unwrap(),
        vec![Event::HitWall { player: "ann".to_string() }]
    );
    assert_eq!(session.player("ann").unwrap().pos, Pos::new(0, 0));
}

#[test]
fn presence_is_sensed_only_through_open_walls() {
    let mut session = corridor_session(&[("ann", Pos::new(0, 0)), ("bob", Pos::new(1, 0))]);
    assert_eq!(
        session.move_player("ann", Dir::Left).unwrap(),
        vec![
            Event::HitOuterWall { player: "ann".to_string() },
            Event::SensedPresence { player: "ann".to_string() },
        ]
    );

    let mut walled = corridor_session(&[("ann", Pos::new(0, 0)), ("bob", Pos::new(0, 1))]);
    assert_eq!(
        walled.move_player("ann", Dir::Down).unwrap(),
        vec![Event::HitWall { player: "ann".to_string() }]
    );
}

#[test]
fn unknown_players_cannot_move() {
    let mut session = corridor_session(&[]);
    let before = session.clone();
    assert_eq!(
        session.move_player("ghost", Dir::Up),
        Err(SessionError::UnknownPlayer("ghost".to_string()))
    );
    assert_eq!(session, before);
}

#[test]
fn fingerprint_tracks_player_moves() {
    let mut session = corridor_session(&[("ann", Pos::new(0, 0))]);
    let before = session.fingerprint();
    session.move_player("ann", Dir::Up).unwrap();
    assert_eq!(session.fingerprint(), before);
    session.move_player("ann", Dir::Right).unwrap();
    assert_ne!(session.fingerprint(), before);
}
