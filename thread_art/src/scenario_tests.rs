use std::collections::HashSet;

use image::{GrayImage, Luma};

use crate::{
    compute,
    geometry::{Circle, Point},
    verboser::{Message, Silent, Verboser},
    BakedLineTable, CacheMode, ConfigError, DarknessMode, Error, FlatDarkness, Grid, LineTable,
    PairKey, Residual, Selector, Settings,
};

/// Dark disc in the middle of a light background, with a diagonal dark band.
fn portrait(size: u32) -> GrayImage {
    let center = size as f64 / 2.0;
    GrayImage::from_fn(size, size, |x, y| {
        let (dx, dy) = (x as f64 - center, y as f64 - center);
        if (dx * dx + dy * dy).sqrt() < size as f64 / 5.0 {
            Luma([20])
        } else if x.abs_diff(y) < 4 {
            Luma([60])
        } else {
            Luma([220])
        }
    })
}

fn settings(pin_count: usize, steps: usize, min_angular_gap: usize) -> Settings {
    Settings {
        pin_count,
        steps,
        min_angular_gap,
        ..Default::default()
    }
}

fn residual(image: GrayImage) -> Residual {
    Residual::from_luma(image).unwrap()
}

#[test]
fn completed_run_never_reuses_a_chord() {
    let result = compute::<f32>(residual(portrait(120)), &settings(60, 150, 8), &mut Silent)
        .unwrap();
    let chords = result.chords();
    assert_eq!(chords.len(), 150);

    let keys: HashSet<_> = chords
        .iter()
        .map(|chord| PairKey::new(chord.from, chord.to, 60))
        .collect();
    assert_eq!(keys.len(), chords.len());
}

#[test]
fn consecutive_chords_respect_the_gap() {
    let result = compute::<f32>(residual(portrait(120)), &settings(60, 150, 8), &mut Silent)
        .unwrap();
    let circle = result.circle();
    assert_eq!(result.chords()[0].from, 0);
    for pair in result.chords().windows(2) {
        assert_eq!(pair[0].to, pair[1].from);
    }
    for chord in result.chords() {
        assert!(circle.index_distance(chord.from, chord.to) >= 8);
        assert_ne!(chord.from, chord.to);
    }
}

#[test]
fn runs_are_deterministic() {
    let first = compute::<f32>(residual(portrait(96)), &settings(48, 120, 6), &mut Silent)
        .unwrap();
    let second = compute::<f32>(residual(portrait(96)), &settings(48, 120, 6), &mut Silent)
        .unwrap();
    assert_eq!(first.chords(), second.chords());
    assert_eq!(first.build_instructions(), second.build_instructions());
    assert_eq!(first.residual(), second.residual());
}

#[test]
fn lazy_and_eager_tables_agree() {
    let eager = compute::<f64>(residual(portrait(96)), &settings(40, 80, 5), &mut Silent)
        .unwrap();
    let lazy = compute::<f64>(
        residual(portrait(96)),
        &Settings {
            cache: CacheMode::Lazy,
            ..settings(40, 80, 5)
        },
        &mut Silent,
    )
    .unwrap();
    assert_eq!(eager.chords(), lazy.chords());
}

#[test]
fn zero_steps_leave_the_residual_untouched() {
    let gray = GrayImage::from_pixel(400, 400, Luma([128]));
    let result = compute::<f32>(residual(gray.clone()), &settings(200, 0, 20), &mut Silent)
        .unwrap();
    assert!(result.chords().is_empty());
    assert_eq!(result.residual().to_image(), gray);
    assert_eq!(result.visited_pins(), vec![0]);
}

#[test]
fn white_image_still_terminates() {
    let white = GrayImage::from_pixel(100, 100, Luma([255]));
    let result = compute::<f32>(residual(white), &settings(30, 60, 4), &mut Silent).unwrap();
    assert_eq!(result.chords().len(), 60);
    // Every weight is zero, so the first legal pin always wins.
    assert_eq!(result.chords()[0].to, 4);
    assert!(result.residual().pixels().iter().all(|&value| value == 255));
}

#[test]
fn residual_only_gets_lighter() {
    let image = portrait(80);
    let circle = Circle::for_image(80, 32).unwrap();
    let table = BakedLineTable::new(&circle, &mut Silent);
    let mut selector = Selector::<_, _, f32>::new(
        &circle,
        &table,
        residual(image),
        4,
        FlatDarkness::default(),
    );
    for _ in 0..40 {
        let before = selector.residual().clone();
        let chord = selector.step(&mut Silent).unwrap();
        let path: HashSet<Point<i32>> = table
            .path(PairKey::new(chord.from, chord.to, 32))
            .iter()
            .copied()
            .collect();
        for (index, (&old, &new)) in before
            .pixels()
            .iter()
            .zip(selector.residual().pixels())
            .enumerate()
        {
            let point = Point::new((index % 80) as i32, (index / 80) as i32);
            if path.contains(&point) {
                assert!(new >= old);
                assert_eq!(new, old.saturating_add(50));
            } else {
                assert_eq!(new, old);
            }
        }
    }
}

#[test]
fn darker_targets_are_drawn_first() {
    let result = compute::<f32>(residual(portrait(120)), &settings(60, 1, 10), &mut Silent)
        .unwrap();
    let chord = result.chords()[0];
    let circle = result.circle();
    let from = circle.pins()[chord.from].position;
    let to = circle.pins()[chord.to].position;
    // The winning chord out of pin 0 crosses the dark disc.
    let middle = Point::new((from.x + to.x) / 2, (from.y + to.y) / 2);
    let (dx, dy) = (middle.x - 60, middle.y - 60);
    assert!(dx * dx + dy * dy < 30 * 30, "{chord:?} misses the disc");
}

#[test]
fn impossible_gap_fails_the_run() {
    let result = compute::<f32>(residual(portrait(64)), &settings(20, 5, 11), &mut Silent);
    assert!(matches!(
        result,
        Err(Error::NoCandidate(error)) if error.step == 0 && error.pin == 0
    ));
}

#[test]
fn too_many_steps_fail_instead_of_repeating() {
    let result = compute::<f32>(residual(portrait(64)), &settings(6, 16, 0), &mut Silent);
    assert!(matches!(result, Err(Error::NoCandidate(_))));
}

#[test]
fn non_square_input_is_a_configuration_error() {
    assert_eq!(
        Residual::from_luma(GrayImage::new(30, 40)).unwrap_err(),
        ConfigError::NotSquare {
            width: 30,
            height: 40
        }
    );
}

#[test]
fn percentage_darkness_runs() {
    let result = compute::<f32>(
        residual(portrait(80)),
        &Settings {
            darkness: DarknessMode::Percentage(0.5),
            ..settings(40, 50, 5)
        },
        &mut Silent,
    )
    .unwrap();
    assert_eq!(result.chords().len(), 50);
    assert_eq!(result.residual().grid(), &Grid::square(80));
}

#[test]
fn reports_progress() {
    #[derive(Default)]
    struct Recorder {
        pins: usize,
        baked: usize,
        selected: Vec<(usize, usize)>,
    }

    impl Verboser for Recorder {
        fn verbose(&mut self, message: Message) {
            match message {
                Message::Pins(count) => self.pins = count,
                Message::Baked(count) => self.baked = count,
                Message::Selected { from, to, .. } => self.selected.push((from, to)),
                Message::Baking(_) | Message::Computing(_) => {}
            }
        }
    }

    let mut recorder = Recorder::default();
    let result = compute::<f32>(residual(portrait(64)), &settings(16, 10, 3), &mut recorder)
        .unwrap();
    assert_eq!(recorder.pins, 16);
    assert_eq!(recorder.baked, 16 * 15 / 2);
    let chords: Vec<_> = result.chords().iter().map(|c| (c.from, c.to)).collect();
    assert_eq!(recorder.selected, chords);
}
