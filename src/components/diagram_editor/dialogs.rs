/// User confirmation capability used by the editor for label edits, the
/// destructive clear and import errors.
pub trait Dialogs {
	/// `None` when the user cancels; `Some("")` when they submit blank text.
	fn ask_text(&mut self, prompt: &str, default: &str) -> Option<String>;

	fn ask_confirm(&mut self, prompt: &str) -> bool;

	fn notify_error(&mut self, message: &str);
}

/// Blocking `prompt`/`confirm`/`alert` of the browser window.
pub struct BrowserDialogs;

impl Dialogs for BrowserDialogs {
	fn ask_text(&mut self, prompt: &str, default: &str) -> Option<String> {
		let window = web_sys::window()?;
		match window.prompt_with_message_and_default(prompt, default) {
			Ok(answer) => answer,
			Err(err) => {
				log::error!("prompt failed: {err:?}");
				None
			}
		}
	}

	fn ask_confirm(&mut self, prompt: &str) -> bool {
		web_sys::window()
			.and_then(|w| w.confirm_with_message(prompt).ok())
			.unwrap_or(false)
	}

	fn notify_error(&mut self, message: &str) {
		if let Some(window) = web_sys::window() {
			let _ = window.alert_with_message(message);
		}
	}
}

#[cfg(test)]
pub mod testing {
	use std::collections::VecDeque;

	use super::Dialogs;

	/// Replays queued answers and records what was asked.
	#[derive(Default)]
	pub struct ScriptedDialogs {
		pub texts: VecDeque<Option<String>>,
		pub confirms: VecDeque<bool>,
		pub prompts: Vec<String>,
		pub defaults: Vec<String>,
		pub errors: Vec<String>,
	}

	impl ScriptedDialogs {
		pub fn answering_text(answer: Option<&str>) -> Self {
			Self {
				texts: VecDeque::from([answer.map(str::to_owned)]),
				..Self::default()
			}
		}

		pub fn confirming(answer: bool) -> Self {
			Self {
				confirms: VecDeque::from([answer]),
				..Self::default()
			}
		}
	}

	impl Dialogs for ScriptedDialogs {
		fn ask_text(&mut self, prompt: &str, default: &str) -> Option<String> {
			self.prompts.push(prompt.to_owned());
			self.defaults.push(default.to_owned());
			self.texts.pop_front().flatten()
		}

		fn ask_confirm(&mut self, prompt: &str) -> bool {
			self.prompts.push(prompt.to_owned());
			self.confirms.pop_front().unwrap_or(false)
		}

		fn notify_error(&mut self, message: &str) {
			self.errors.push(message.to_owned());
		}
	}
}
