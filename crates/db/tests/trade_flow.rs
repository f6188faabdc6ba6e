//! Integration tests for the repository layer against a real database:
//! entity CRUD, offer card links, transactional settlement writes, and
//! constraint behaviour.

use deckswap_core::publication::{CardTransfer, Settlement};
use deckswap_db::models::card::{Card, CreateCard};
use deckswap_db::models::user::{CreateUser, User};
use deckswap_db::repositories::{CardRepo, OfferRepo, PublicationRepo, StatsRepo, TradeRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_user(pool: &PgPool, username: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "$argon2id$test".to_string(),
        },
    )
    .await
    .expect("user insert should succeed")
}

async fn seed_card(pool: &PgPool, owner_id: i64, archetype: &str) -> Card {
    CardRepo::create(
        pool,
        owner_id,
        &CreateCard {
            archetype: archetype.to_string(),
            condition_score: 90,
            image_url: None,
        },
    )
    .await
    .expect("card insert should succeed")
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn publication_and_offer_round_trip(pool: PgPool) {
    let seller = seed_user(&pool, "seller").await;
    let buyer = seed_user(&pool, "buyer").await;
    let listed = seed_card(&pool, seller.id, "Blue-Eyes White Dragon").await;
    let bait = seed_card(&pool, buyer.id, "Dark Magician").await;

    let publication =
        PublicationRepo::create(&pool, seller.id, listed.id, &[], Some(100_00))
            .await
            .unwrap();
    assert_eq!(publication.status, "open");

    let offer = OfferRepo::create(
        &pool,
        publication.id,
        buyer.id,
        Some(50_00),
        &[bait.id],
        "pending",
    )
    .await
    .unwrap();

    let offers = OfferRepo::list_for_publication(&pool, publication.id)
        .await
        .unwrap();
    assert_eq!(offers.len(), 1);
    assert_eq!(offers[0].id, offer.id);

    assert_eq!(OfferRepo::card_ids(&pool, offer.id).await.unwrap(), vec![bait.id]);

    let linked = CardRepo::find_for_offer(&pool, offer.id).await.unwrap();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].id, bait.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn find_by_ids_returns_only_existing_cards(pool: PgPool) {
    let user = seed_user(&pool, "collector").await;
    let card = seed_card(&pool, user.id, "Summoned Skull").await;

    let found = CardRepo::find_by_ids(&pool, &[card.id, 9999]).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, card.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_username_violates_unique_constraint(pool: PgPool) {
    seed_user(&pool, "dupe").await;
    let err = UserRepo::create(
        &pool,
        &CreateUser {
            username: "dupe".to_string(),
            email: "other@example.com".to_string(),
            password_hash: "$argon2id$test".to_string(),
        },
    )
    .await
    .unwrap_err();

    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_users_username"));
        }
        other => panic!("expected database error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Settlement writes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn apply_settlement_commits_every_row(pool: PgPool) {
    let seller = seed_user(&pool, "seller").await;
    let winner = seed_user(&pool, "winner").await;
    let loser = seed_user(&pool, "loser").await;

    let listed = seed_card(&pool, seller.id, "Blue-Eyes White Dragon").await;
    let traded = seed_card(&pool, winner.id, "Dark Magician").await;

    let publication =
        PublicationRepo::create(&pool, seller.id, listed.id, &[], Some(100_00))
            .await
            .unwrap();
    let winning = OfferRepo::create(&pool, publication.id, winner.id, None, &[traded.id], "pending")
        .await
        .unwrap();
    let losing = OfferRepo::create(&pool, publication.id, loser.id, Some(80_00), &[], "pending")
        .await
        .unwrap();

    let settlement = Settlement {
        accepted_offer_id: winning.id,
        rejected_offer_ids: vec![losing.id],
        transferred_cards: vec![
            CardTransfer { card_id: traded.id, new_owner_id: seller.id },
            CardTransfer { card_id: listed.id, new_owner_id: winner.id },
        ],
    };
    TradeRepo::apply_settlement(&pool, publication.id, &settlement)
        .await
        .unwrap();

    let publication = PublicationRepo::find_by_id(&pool, publication.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(publication.status, "closed");

    let winning = OfferRepo::find_by_id(&pool, winning.id).await.unwrap().unwrap();
    assert_eq!(winning.status, "accepted");
    assert!(winning.closed_at.is_some());

    let losing = OfferRepo::find_by_id(&pool, losing.id).await.unwrap().unwrap();
    assert_eq!(losing.status, "rejected");

    let listed = CardRepo::find_by_id(&pool, listed.id).await.unwrap().unwrap();
    assert_eq!(listed.owner_id, winner.id);
    let traded = CardRepo::find_by_id(&pool, traded.id).await.unwrap().unwrap();
    assert_eq!(traded.owner_id, seller.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn apply_cancellation_rejects_listed_offers(pool: PgPool) {
    let seller = seed_user(&pool, "seller").await;
    let bidder = seed_user(&pool, "bidder").await;
    let listed = seed_card(&pool, seller.id, "Celtic Guardian").await;

    let publication =
        PublicationRepo::create(&pool, seller.id, listed.id, &[], Some(10_00))
            .await
            .unwrap();
    let offer = OfferRepo::create(&pool, publication.id, bidder.id, Some(5_00), &[], "pending")
        .await
        .unwrap();

    TradeRepo::apply_cancellation(&pool, publication.id, &[offer.id])
        .await
        .unwrap();

    let publication = PublicationRepo::find_by_id(&pool, publication.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(publication.status, "closed");
    let offer = OfferRepo::find_by_id(&pool, offer.id).await.unwrap().unwrap();
    assert_eq!(offer.status, "rejected");
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn stats_count_trades(pool: PgPool) {
    let seller = seed_user(&pool, "seller").await;
    let buyer = seed_user(&pool, "buyer").await;
    let listed = seed_card(&pool, seller.id, "Kuriboh").await;

    let publication =
        PublicationRepo::create(&pool, seller.id, listed.id, &[], Some(1_00))
            .await
            .unwrap();
    let offer = OfferRepo::create(&pool, publication.id, buyer.id, Some(1_00), &[], "pending")
        .await
        .unwrap();

    let settlement = Settlement {
        accepted_offer_id: offer.id,
        rejected_offer_ids: vec![],
        transferred_cards: vec![CardTransfer { card_id: listed.id, new_owner_id: buyer.id }],
    };
    TradeRepo::apply_settlement(&pool, publication.id, &settlement)
        .await
        .unwrap();

    let stats = StatsRepo::collect(&pool).await.unwrap();
    assert_eq!(stats.users, 2);
    assert_eq!(stats.cards, 1);
    assert_eq!(stats.publications_open, 0);
    assert_eq!(stats.publications_closed, 1);
    assert_eq!(stats.trades_completed, 1);
    assert_eq!(stats.offers_pending, 0);
}
