pub enum Message {
    /// Pins laid out on the circle.
    Pins(usize),
    /// Number of chords about to be rasterized.
    Baking(usize),
    Baked(usize),
    Computing(usize),
    Selected {
        step: usize,
        from: usize,
        to: usize,
        weight: f64,
    },
}

pub trait Verboser {
    fn verbose(&mut self, message: Message);
}

pub struct Silent;

impl Verboser for Silent {
    fn verbose(&mut self, _: Message) {}
}

/// Forwards progress to the `log` facade.
pub struct Logger;

impl Verboser for Logger {
    fn verbose(&mut self, message: Message) {
        match message {
            Message::Pins(count) => log::info!("laid out {count} pins"),
            Message::Baking(count) => log::info!("rasterizing {count} chords"),
            Message::Baked(count) => log::info!("line table ready with {count} chords"),
            Message::Computing(step) => log::trace!("scoring step {step}"),
            Message::Selected {
                step,
                from,
                to,
                weight,
            } => log::debug!("step {step}: {from} -> {to} (weight {weight:.3})"),
        }
    }
}

impl<V: Verboser + ?Sized> Verboser for &mut V {
    fn verbose(&mut self, message: Message) {
        (**self).verbose(message)
    }
}
