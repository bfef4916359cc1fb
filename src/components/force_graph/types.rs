/// Pointer interaction reported back to whoever owns the view model.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasEvent {
	/// A node was clicked; `extend` is set when shift was held.
	NodeClicked { id: String, extend: bool },
	/// Empty canvas was clicked without panning.
	BackgroundClicked,
}
