use quiply_web::api::User;
use quiply_web::state::Store;
use std::cell::RefCell;
use std::rc::Rc;

fn user(name: &str) -> User {
	User {
		id: Some(1),
		username: name.to_owned(),
		email: None,
		bio: None,
		stats: None,
	}
}

#[test]
fn set_user_flips_authentication() {
	let store = Store::new();
	assert!(!store.is_authenticated());

	store.set_user(Some(user("nia")));
	assert!(store.is_authenticated());
	assert_eq!(store.user().map(|user| user.username), Some("nia".to_owned()));

	store.set_user(None);
	assert!(!store.is_authenticated());
}

#[test]
fn subscribers_are_notified_in_subscription_order() {
	let store = Store::new();
	let seen = Rc::new(RefCell::new(Vec::new()));

	for marker in ["first", "second", "third"] {
		let seen = Rc::clone(&seen);
		store.on("user", move |_| seen.borrow_mut().push(marker));
	}

	store.set_user(Some(user("nia")));
	assert_eq!(*seen.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn subscribers_observe_the_post_update_value() {
	let store = Store::new();
	let seen = Rc::new(RefCell::new(Vec::new()));
	{
		let seen = Rc::clone(&seen);
		store.on("user", move |user| {
			seen.borrow_mut().push(user.map(|user| user.username.clone()));
		});
	}

	store.set_user(Some(user("nia")));
	store.set_user(None);
	assert_eq!(*seen.borrow(), vec![Some("nia".to_owned()), None]);
}

#[test]
fn off_removes_exactly_one_subscriber() {
	let store = Store::new();
	let seen = Rc::new(RefCell::new(Vec::new()));

	let kept = {
		let seen = Rc::clone(&seen);
		store.on("user", move |_| seen.borrow_mut().push("kept"))
	};
	let dropped = {
		let seen = Rc::clone(&seen);
		store.on("user", move |_| seen.borrow_mut().push("dropped"))
	};

	store.off("user", dropped);
	store.set_user(Some(user("nia")));
	assert_eq!(*seen.borrow(), vec!["kept"]);

	store.off("user", kept);
	store.set_user(None);
	assert_eq!(*seen.borrow(), vec!["kept"]);
}

#[test]
fn unused_channels_are_valid_and_silent() {
	let store = Store::new();
	let seen = Rc::new(RefCell::new(0_u32));
	{
		let seen = Rc::clone(&seen);
		store.on("theme", move |_| *seen.borrow_mut() += 1);
	}

	store.set_user(Some(user("nia")));
	assert_eq!(*seen.borrow(), 0);
}
