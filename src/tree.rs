use crate::api::Comment;
use hashbrown::HashMap;

/// Reconciles a comment payload into a renderable reply tree.
///
/// A payload whose first element already carries `replies` is trusted to be fully
/// pre-nested and returned unchanged. Flat payloads are stitched together by parent id:
/// original list order is preserved at every level, and a comment whose parent is unknown
/// becomes a root rather than being dropped.
#[must_use]
pub fn build_tree(comments: Vec<Comment>) -> Vec<Comment> {
	if comments.first().map_or(false, |first| first.replies.is_some()) {
		return comments;
	}

	// `0` doubles as "no parent" in older payloads.
	let order: Vec<(u64, Option<u64>)> = comments
		.iter()
		.map(|comment| (comment.id, comment.parent_id.filter(|&parent| parent != 0)))
		.collect();

	let mut by_id: HashMap<u64, Comment> = HashMap::with_capacity(comments.len());
	for mut comment in comments {
		comment.replies = Some(Vec::new());
		by_id.insert(comment.id, comment);
	}

	let mut children: HashMap<u64, Vec<u64>> = HashMap::new();
	let mut roots: Vec<u64> = Vec::new();
	for (id, parent) in order {
		match parent {
			Some(parent) if parent != id && by_id.contains_key(&parent) => {
				children.entry(parent).or_default().push(id);
			}
			_ => roots.push(id),
		}
	}

	roots
		.into_iter()
		.filter_map(|id| assemble(id, &mut by_id, &children))
		.collect()
}

fn assemble(id: u64, by_id: &mut HashMap<u64, Comment>, children: &HashMap<u64, Vec<u64>>) -> Option<Comment> {
	let mut comment = by_id.remove(&id)?;
	if let Some(child_ids) = children.get(&id) {
		let replies: Vec<Comment> = child_ids
			.iter()
			.filter_map(|&child| assemble(child, by_id, children))
			.collect();
		comment.replies = Some(replies);
	}
	Some(comment)
}

/// Looks a comment up by id anywhere in a (possibly nested) list.
pub fn find_mut(comments: &mut [Comment], id: u64) -> Option<&mut Comment> {
	for comment in comments {
		if comment.id == id {
			return Some(comment);
		}
		if let Some(replies) = comment.replies.as_mut() {
			if let Some(found) = find_mut(replies, id) {
				return Some(found);
			}
		}
	}
	None
}
