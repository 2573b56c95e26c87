/// Breaks the `Rc` cycle between a controller and the channel closures that
/// hold it, by dropping its subscriptions.
pub trait Destroyable {
    fn destroy(&mut self);
}
