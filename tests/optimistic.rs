use quiply_web::mutate::flip;

#[test]
fn toggle_round_trip_restores_the_counter() {
	let mut active = false;
	let mut count = 5;

	flip(&mut active, &mut count);
	assert!(active);
	assert_eq!(count, 6);

	flip(&mut active, &mut count);
	assert!(!active);
	assert_eq!(count, 5);
}

#[test]
fn deactivating_at_zero_never_goes_negative() {
	// A stale payload can report `active` with a zero counter.
	let mut active = true;
	let mut count = 0;

	flip(&mut active, &mut count);
	assert!(!active);
	assert_eq!(count, 0);
}

#[test]
fn activation_counts_up_from_zero() {
	let mut active = false;
	let mut count = 0;

	flip(&mut active, &mut count);
	assert!(active);
	assert_eq!(count, 1);
}
