use chrono::NaiveDate;
use shelternet_db::{
    AnimalReturn, AnimalStatus, DbError, NewAnimal, NewApplication, NewShelter, ShelterDb,
    Violation, RETURN_REQUEST_NOTE,
};

fn animal(species: &str, breed: &str, year: i32) -> NewAnimal {
    NewAnimal::new(
        species,
        breed,
        NaiveDate::from_ymd_opt(year, 4, 1).unwrap(),
        "M",
        "black",
    )
}

async fn remaining(db: &ShelterDb, shelter_id: i64) -> i64 {
    db.shelter_get(shelter_id)
        .await
        .unwrap()
        .unwrap()
        .remaining_capacity
}

async fn status(db: &ShelterDb, animal_id: i64) -> AnimalStatus {
    db.animal_get(animal_id).await.unwrap().unwrap().status
}

#[tokio::test]
async fn test_request_moves_animals_offsite_and_frees_capacity() {
    let db = ShelterDb::open_in_memory().await.unwrap();
    let shelter = db.shelter_create(&NewShelter::new("SHELTER1", 50)).await.unwrap();
    let a1 = db.animal_create(&animal("Dog", "Dalmatian", 2009).in_shelter(shelter.id)).await.unwrap();
    let a2 = db.animal_create(&animal("Cat", "Tabby", 2010).in_shelter(shelter.id)).await.unwrap();
    let a3 = db.animal_create(&animal("Dog", "Cocker Spaniel", 2006).in_shelter(shelter.id)).await.unwrap();
    assert_eq!(remaining(&db, shelter.id).await, 47);

    let updated = db.animals_request(&[a1.id, a2.id]).await.unwrap();

    assert_eq!(updated.iter().map(|a| a.id).collect::<Vec<_>>(), vec![a1.id, a2.id]);
    assert!(updated.iter().all(|a| a.status == AnimalStatus::Offsite));
    assert_eq!(remaining(&db, shelter.id).await, 49);
    assert_eq!(status(&db, a3.id).await, AnimalStatus::Available);
}

#[tokio::test]
async fn test_request_with_adopted_animal_changes_nothing() {
    let db = ShelterDb::open_in_memory().await.unwrap();
    let shelter = db.shelter_create(&NewShelter::new("SHELTER1", 50)).await.unwrap();
    let a1 = db.animal_create(&animal("Dog", "Dalmatian", 2009).in_shelter(shelter.id)).await.unwrap();
    let a2 = db
        .animal_create(
            &animal("Cat", "Tabby", 2010)
                .in_shelter(shelter.id)
                .with_status(AnimalStatus::Adopted),
        )
        .await
        .unwrap();
    let a3 = db.animal_create(&animal("Dog", "Cocker Spaniel", 2006).in_shelter(shelter.id)).await.unwrap();
    assert_eq!(remaining(&db, shelter.id).await, 48);

    let err = db.animals_request(&[a1.id, a2.id]).await.unwrap_err();

    match err {
        DbError::Rejected(rejection) => assert_eq!(
            rejection.violations,
            vec![Violation::WrongStatus {
                animal_id: a2.id,
                current: AnimalStatus::Adopted
            }]
        ),
        other => panic!("expected rejection, got {other:?}"),
    }
    assert_eq!(remaining(&db, shelter.id).await, 48);
    assert_eq!(status(&db, a1.id).await, AnimalStatus::Available);
    assert_eq!(status(&db, a2.id).await, AnimalStatus::Adopted);
    assert_eq!(status(&db, a3.id).await, AnimalStatus::Available);
}

#[tokio::test]
async fn test_request_then_return_round_trip() {
    let db = ShelterDb::open_in_memory().await.unwrap();
    let shelter = db.shelter_create(&NewShelter::new("Dallas Animal Shelter", 20)).await.unwrap();
    let a1 = db.animal_create(&animal("Dog", "Dalmatian", 2009).in_shelter(shelter.id)).await.unwrap();
    let a2 = db.animal_create(&animal("Cat", "Tabby", 2010).in_shelter(shelter.id)).await.unwrap();
    let before = remaining(&db, shelter.id).await;

    db.animals_request(&[a1.id, a2.id]).await.unwrap();
    assert_eq!(remaining(&db, shelter.id).await, before + 2);

    let returned = db
        .animals_return(&[
            AnimalReturn::new(a1.id, "Bob is super friendly"),
            AnimalReturn::new(a2.id, "Seems to have fleas"),
        ])
        .await
        .unwrap();

    assert_eq!(returned[0].status, AnimalStatus::Available);
    assert_eq!(returned[0].notes.as_deref(), Some("Bob is super friendly"));
    assert_eq!(returned[1].notes.as_deref(), Some("Seems to have fleas"));
    assert_eq!(returned[0].shelter_id, Some(shelter.id));
    assert_eq!(remaining(&db, shelter.id).await, before);
}

#[tokio::test]
async fn test_return_rejects_animal_not_offsite() {
    let db = ShelterDb::open_in_memory().await.unwrap();
    let shelter = db.shelter_create(&NewShelter::new("Dallas Animal Shelter", 20)).await.unwrap();
    let a1 = db
        .animal_create(
            &animal("Dog", "Dalmatian", 2009)
                .in_shelter(shelter.id)
                .with_status(AnimalStatus::Offsite),
        )
        .await
        .unwrap();
    let a2 = db.animal_create(&animal("Cat", "Tabby", 2010).in_shelter(shelter.id)).await.unwrap();

    let err = db
        .animals_return(&[
            AnimalReturn::new(a1.id, "Bob is super friendly"),
            AnimalReturn::new(a2.id, "Seems to have fleas"),
        ])
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::Rejected(_)));

    let fetched = db.animal_get(a1.id).await.unwrap().unwrap();
    assert_eq!(fetched.status, AnimalStatus::Offsite);
    assert_eq!(fetched.notes, None);
    assert_eq!(remaining(&db, shelter.id).await, 19);
}

#[tokio::test]
async fn test_return_into_full_shelter_is_rejected_atomically() {
    let db = ShelterDb::open_in_memory().await.unwrap();
    let shelter = db.shelter_create(&NewShelter::new("Tiny", 1)).await.unwrap();
    let a1 = db.animal_create(&animal("Dog", "Dalmatian", 2009).in_shelter(shelter.id)).await.unwrap();
    db.animals_request(&[a1.id]).await.unwrap();
    db.animal_create(&animal("Cat", "Tabby", 2010).in_shelter(shelter.id)).await.unwrap();
    assert_eq!(remaining(&db, shelter.id).await, 0);

    let err = db
        .animals_return(&[AnimalReturn::new(a1.id, "back early")])
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DbError::CapacityExceeded {
            requested: 1,
            remaining: 0
        }
    ));
    assert_eq!(status(&db, a1.id).await, AnimalStatus::Offsite);
    assert_eq!(remaining(&db, shelter.id).await, 0);
}

#[tokio::test]
async fn test_return_request_sets_fixed_note() {
    let db = ShelterDb::open_in_memory().await.unwrap();
    let shelter = db.shelter_create(&NewShelter::new("Dallas Animal Shelter", 20)).await.unwrap();
    let offsite = |a: NewAnimal| a.in_shelter(shelter.id).with_status(AnimalStatus::Offsite);
    let a1 = db.animal_create(&offsite(animal("Dog", "Dalmatian", 2009))).await.unwrap();
    let a2 = db.animal_create(&offsite(animal("Cat", "Tabby", 2010))).await.unwrap();
    assert_eq!(remaining(&db, shelter.id).await, 20);

    db.animals_return_request(&[a1.id, a2.id]).await.unwrap();

    for id in [a1.id, a2.id] {
        let fetched = db.animal_get(id).await.unwrap().unwrap();
        assert_eq!(fetched.status, AnimalStatus::Available);
        assert_eq!(fetched.notes.as_deref(), Some(RETURN_REQUEST_NOTE));
    }
    assert_eq!(remaining(&db, shelter.id).await, 18);
}

#[tokio::test]
async fn test_return_request_rejects_pending_animal() {
    let db = ShelterDb::open_in_memory().await.unwrap();
    let shelter = db.shelter_create(&NewShelter::new("Dallas Animal Shelter", 20)).await.unwrap();
    let a1 = db
        .animal_create(&animal("Dog", "Dalmatian", 2009).in_shelter(shelter.id).with_status(AnimalStatus::Offsite))
        .await
        .unwrap();
    let a2 = db
        .animal_create(&animal("Cat", "Tabby", 2010).in_shelter(shelter.id).with_status(AnimalStatus::Pending))
        .await
        .unwrap();

    let err = db.animals_return_request(&[a1.id, a2.id]).await.unwrap_err();

    assert!(matches!(err, DbError::Rejected(_)));
    assert_eq!(status(&db, a1.id).await, AnimalStatus::Offsite);
    assert_eq!(status(&db, a2.id).await, AnimalStatus::Pending);
}

#[tokio::test]
async fn test_adopt_offsite_animals_without_shelter() {
    let db = ShelterDb::open_in_memory().await.unwrap();
    let mut ids = Vec::new();
    for (species, breed) in [("Dog", "Dalmatian"), ("Cat", "African"), ("Tiger", "Bengal")] {
        let created = db
            .animal_create(&animal(species, breed, 2015).with_status(AnimalStatus::Offsite))
            .await
            .unwrap();
        ids.push(created.id);
    }

    let adopted = db.animals_adopt(&ids).await.unwrap();

    assert_eq!(adopted.len(), 3);
    for id in ids {
        assert_eq!(status(&db, id).await, AnimalStatus::Adopted);
    }
}

#[tokio::test]
async fn test_adopt_rejects_already_adopted() {
    let db = ShelterDb::open_in_memory().await.unwrap();
    let shelter = db.shelter_create(&NewShelter::new("SHELTER1", 3)).await.unwrap();
    let a1 = db.animal_create(&animal("Dog", "Dalmatian", 2009).in_shelter(shelter.id)).await.unwrap();
    db.animals_adopt(&[a1.id]).await.unwrap();
    assert_eq!(remaining(&db, shelter.id).await, 3);

    let err = db.animals_adopt(&[a1.id]).await.unwrap_err();
    assert!(matches!(err, DbError::Rejected(_)));
    assert_eq!(remaining(&db, shelter.id).await, 3);
}

#[tokio::test]
async fn test_unknown_and_duplicate_ids_reject_batch() {
    let db = ShelterDb::open_in_memory().await.unwrap();
    let a1 = db.animal_create(&animal("Dog", "Dalmatian", 2009)).await.unwrap();

    let err = db.animals_request(&[a1.id, 999]).await.unwrap_err();
    let DbError::Rejected(rejection) = err else {
        panic!("expected rejection");
    };
    assert_eq!(rejection.violations, vec![Violation::Unknown { animal_id: 999 }]);

    let err = db.animals_request(&[a1.id, a1.id]).await.unwrap_err();
    assert!(matches!(err, DbError::Rejected(_)));
    assert_eq!(status(&db, a1.id).await, AnimalStatus::Available);
}

#[tokio::test]
async fn test_empty_batch_is_a_no_op() {
    let db = ShelterDb::open_in_memory().await.unwrap();
    assert!(db.animals_request(&[]).await.unwrap().is_empty());
    assert!(db.animals_return(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_animal_create_into_full_or_missing_shelter() {
    let db = ShelterDb::open_in_memory().await.unwrap();
    let shelter = db.shelter_create(&NewShelter::new("Tiny", 1)).await.unwrap();
    db.animal_create(&animal("Dog", "Dalmatian", 2009).in_shelter(shelter.id)).await.unwrap();

    let err = db
        .animal_create(&animal("Cat", "Tabby", 2010).in_shelter(shelter.id))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::CapacityExceeded { .. }));

    // Animals that do not occupy a slot still fit.
    db.animal_create(
        &animal("Cat", "Tabby", 2010)
            .in_shelter(shelter.id)
            .with_status(AnimalStatus::Offsite),
    )
    .await
    .unwrap();

    let err = db
        .animal_create(&animal("Cat", "Tabby", 2010).in_shelter(12345))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound(_)));
    assert_eq!(db.animal_list().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_application_intake_and_review() {
    let db = ShelterDb::open_in_memory().await.unwrap();
    let shelter = db.shelter_create(&NewShelter::new("SHELTER1", 5)).await.unwrap();
    let dog = db.animal_create(&animal("DOGGY", "DOG", 2020).in_shelter(shelter.id)).await.unwrap();

    let application = db
        .application_submit(&NewApplication::new(
            "JOHN",
            "5131 W Thunderbird Rd.",
            "602-444-4444",
            dog.id,
        ))
        .await
        .unwrap();
    assert_eq!(application.status, shelternet_db::ApplicationStatus::Pending);
    assert_eq!(db.application_get(application.id).await.unwrap(), Some(application.clone()));

    let approved = db.application_approve(application.id).await.unwrap().unwrap();
    assert_eq!(approved.status, shelternet_db::ApplicationStatus::Approved);
    assert_eq!(status(&db, dog.id).await, AnimalStatus::Pending);
    assert_eq!(remaining(&db, shelter.id).await, 4);

    // Reviewing twice is an invalid transition.
    assert!(matches!(
        db.application_reject(application.id).await,
        Err(DbError::InvalidState(_))
    ));
    assert!(db.application_approve(9999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_application_for_unknown_animal_fails() {
    let db = ShelterDb::open_in_memory().await.unwrap();
    let err = db
        .application_submit(&NewApplication::new(
            "JOHN",
            "5131 W Thunderbird Rd.",
            "602-444-4444",
            1,
        ))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::NotFound(_)));
}

#[tokio::test]
async fn test_approval_requires_available_animal() {
    let db = ShelterDb::open_in_memory().await.unwrap();
    let cat = db
        .animal_create(&animal("Cat", "Tabby", 2010).with_status(AnimalStatus::Offsite))
        .await
        .unwrap();
    let application = db
        .application_submit(&NewApplication::new("JANE", "1 Main St.", "555-0100", cat.id))
        .await
        .unwrap();

    assert!(matches!(
        db.application_approve(application.id).await,
        Err(DbError::InvalidState(_))
    ));
    let unchanged = db.application_get(application.id).await.unwrap().unwrap();
    assert_eq!(unchanged.status, shelternet_db::ApplicationStatus::Pending);

    let rejected = db.application_reject(application.id).await.unwrap().unwrap();
    assert_eq!(rejected.status, shelternet_db::ApplicationStatus::Rejected);
    assert_eq!(status(&db, cat.id).await, AnimalStatus::Offsite);
}
