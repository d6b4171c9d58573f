use quiply_web::api::Comment;
use quiply_web::tree::{build_tree, find_mut};
use serde_json::json;

fn comments(value: serde_json::Value) -> Vec<Comment> {
	serde_json::from_value(value).expect("test payload should deserialize")
}

#[test]
fn flat_list_nests_by_parent_and_keeps_order() {
	let tree = build_tree(comments(json!([
		{ "id": 1, "parent_id": null, "content": "root one" },
		{ "id": 2, "parent_id": 1, "content": "reply" },
		{ "id": 3, "parent_id": 99, "content": "orphan" },
	])));

	// Unknown parent 99 degrades comment 3 to a root; original order is preserved.
	assert_eq!(tree.len(), 2);
	assert_eq!(tree[0].id, 1);
	assert_eq!(tree[1].id, 3);

	let replies = tree[0].replies.as_ref().expect("roots carry a replies list");
	assert_eq!(replies.len(), 1);
	assert_eq!(replies[0].id, 2);
	assert!(tree[1].replies.as_ref().expect("replies list").is_empty());
}

#[test]
fn legacy_parent_field_name_is_honoured() {
	let tree = build_tree(comments(json!([
		{ "id": 1, "content": "root" },
		{ "id": 2, "parent_comment_id": 1, "content": "reply" },
	])));

	assert_eq!(tree.len(), 1);
	assert_eq!(tree[0].replies.as_ref().expect("replies list")[0].id, 2);
}

#[test]
fn zero_parent_means_root() {
	let tree = build_tree(comments(json!([
		{ "id": 7, "parent_id": 0, "content": "root" },
	])));

	assert_eq!(tree.len(), 1);
	assert_eq!(tree[0].id, 7);
}

#[test]
fn pre_nested_payload_is_returned_unchanged() {
	let input = comments(json!([
		{ "id": 1, "content": "root", "replies": [ { "id": 2, "content": "reply" } ] },
		{ "id": 3, "content": "flat straggler", "parent_id": 1 },
	]));

	let tree = build_tree(input);

	// The first element carrying `replies` marks the whole payload as pre-nested;
	// the straggler stays un-reconciled at the top level.
	assert_eq!(tree.len(), 2);
	assert_eq!(tree[0].replies.as_ref().expect("pre-nested replies")[0].id, 2);
	assert!(tree[1].replies.is_none());
}

#[test]
fn reply_chains_nest_to_arbitrary_depth() {
	let tree = build_tree(comments(json!([
		{ "id": 1, "content": "depth 0" },
		{ "id": 2, "parent_id": 1, "content": "depth 1" },
		{ "id": 3, "parent_id": 2, "content": "depth 2" },
		{ "id": 4, "parent_id": 3, "content": "depth 3" },
		{ "id": 5, "parent_id": 4, "content": "depth 4" },
	])));

	let mut cursor = &tree[0];
	for expected in 2..=5 {
		let replies = cursor.replies.as_ref().expect("nested replies");
		assert_eq!(replies.len(), 1);
		cursor = &replies[0];
		assert_eq!(cursor.id, expected);
	}
}

#[test]
fn find_mut_reaches_nested_comments() {
	let mut tree = build_tree(comments(json!([
		{ "id": 1, "content": "root" },
		{ "id": 2, "parent_id": 1, "content": "reply" },
	])));

	let nested = find_mut(&mut tree, 2).expect("nested comment should be found");
	nested.ups_count = 7;
	assert_eq!(tree[0].replies.as_ref().expect("replies list")[0].ups_count, 7);

	assert!(find_mut(&mut tree, 99).is_none());
}
