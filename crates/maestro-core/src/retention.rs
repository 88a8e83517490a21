//! Image retention policy.
//!
//! Every round trip resends the whole conversation, so screenshot payloads
//! grow the request without bound. This pass removes the oldest image
//! artifacts in fixed-size blocks before the model call. Removing in blocks
//! keeps longer stable prefixes for downstream caching of repeated request
//! prefixes; removing one-by-one would invalidate such a cache on every
//! turn.

use tracing::debug;

use crate::conversation::Turn;

/// Default removal block size.
pub const DEFAULT_REMOVAL_BLOCK: usize = 3;

/// Removes image artifacts from the oldest turns until at most `retain`
/// images remain, with the removal count floored to a multiple of
/// `block_size`.
///
/// `retain = 0` means unlimited: the pass is skipped entirely. This overload
/// is inherited, documented behavior; "remove everything" is
/// [`strip_images`].
///
/// Non-image artifacts are never touched and keep their relative order. A
/// turn's artifact list is cleared wholesale only when it consists entirely
/// of images that are all slated for removal.
pub fn prune_images(turns: &mut [Turn], retain: usize, block_size: usize) {
	if retain == 0 {
		return;
	}

	let total: usize = turns.iter().map(Turn::image_count).sum();
	if total <= retain {
		return;
	}

	let mut to_remove = total - retain;
	if block_size > 1 {
		to_remove -= to_remove % block_size;
	}
	debug!(
		total_images = total,
		retain = retain,
		to_remove = to_remove,
		"pruning image artifacts"
	);
	if to_remove == 0 {
		return;
	}

	for turn in turns.iter_mut() {
		if to_remove == 0 {
			break;
		}
		let images = turn.image_count();
		if images == 0 {
			continue;
		}

		if images <= to_remove && images == turn.tool_artifacts.len() {
			turn.tool_artifacts.clear();
			to_remove -= images;
		} else {
			turn.tool_artifacts.retain(|artifact| {
				if artifact.is_image() && to_remove > 0 {
					to_remove -= 1;
					false
				} else {
					true
				}
			});
		}
	}
}

/// Removes every image artifact from every turn. Used when prompt caching is
/// enabled: paying full price for a stable cache-eligible prefix beats
/// paying the read-discount price against a prefix that keeps changing
/// because images were truncated.
pub fn strip_images(turns: &mut [Turn]) {
	for turn in turns.iter_mut() {
		if turn.image_count() == 0 {
			continue;
		}
		turn.tool_artifacts.retain(|artifact| !artifact.is_image());
	}
}
