use quiply_web::router::{parse_hash, Router};

#[test]
fn literal_pattern_wins_over_capture() {
	let router = Router::new();
	router
		.add_route("/quips/:id", |_| async {})
		.add_route("/quips/new", |_| async {});

	// The exact-string fast path beats the earlier-registered capture pattern.
	let matched = router.match_route("/quips/new").expect("should match");
	assert_eq!(matched.pattern, "/quips/new");
	assert!(matched.params.is_empty());
}

#[test]
fn capture_segment_binds_by_name() {
	let router = Router::new();
	router.add_route("/quips/:id", |_| async {});

	let matched = router.match_route("/quips/42").expect("should match");
	assert_eq!(matched.pattern, "/quips/:id");
	assert_eq!(matched.params.get("id").map(String::as_str), Some("42"));
}

#[test]
fn ambiguous_patterns_resolve_in_registration_order() {
	let router = Router::new();
	router
		.add_route("/users/:username", |_| async {})
		.add_route("/users/:id", |_| async {});

	let matched = router.match_route("/users/nia").expect("should match");
	assert_eq!(matched.pattern, "/users/:username");
	assert_eq!(matched.params.get("username").map(String::as_str), Some("nia"));
}

#[test]
fn segment_counts_must_agree() {
	let router = Router::new();
	router.add_route("/users/:username", |_| async {});

	assert!(router.match_route("/users").is_none());
	assert!(router.match_route("/users/nia/quips").is_none());
}

#[test]
fn unregistered_path_does_not_match() {
	let router = Router::new();
	router.add_route("/", |_| async {}).add_route("/login", |_| async {});

	assert!(router.match_route("/definitely-not-a-route").is_none());
}

#[test]
fn empty_fragment_is_the_root_path() {
	assert_eq!(parse_hash(""), ("/".to_owned(), Vec::new()));
	assert_eq!(parse_hash("#"), ("/".to_owned(), Vec::new()));
}

#[test]
fn fragment_splits_into_path_and_query_pairs() {
	let (path, pairs) = parse_hash("#/quips/42?sort=new&page=2");
	assert_eq!(path, "/quips/42");
	assert_eq!(
		pairs,
		vec![
			("sort".to_owned(), "new".to_owned()),
			("page".to_owned(), "2".to_owned()),
		]
	);
}

#[test]
fn query_pair_without_value_is_empty() {
	let (path, pairs) = parse_hash("#/?flag");
	assert_eq!(path, "/");
	assert_eq!(pairs, vec![("flag".to_owned(), String::new())]);
}

#[test]
fn trailing_question_mark_carries_no_params() {
	let (path, pairs) = parse_hash("#/login?");
	assert_eq!(path, "/login");
	assert!(pairs.is_empty());
}
