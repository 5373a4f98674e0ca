//! Fixture set loaded by the tests and by `seed_on_start`.
//!
//! Review 2 ("Jenga") has exactly three comments and five votes, review 1
//! has none, and the `children's games` category has no reviews.

use chrono::{DateTime, Utc};

use super::seed::{CommentSeed, ReviewSeed, SeedData};
use crate::models::{Category, User};

const DEFAULT_IMG: &str =
    "https://images.pexels.com/photos/163064/play-stone-network-networked-interactive-163064.jpeg";
const LOREM: &str = "Fugiat fugiat enim officia laborum quis. Aliquip laboris non nulla \
     nostrud magna exercitation in ullamco aute laborum cillum nisi sint.";

// Unparseable stamps become the epoch, which test_fixture_shape catches
fn at(timestamp: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

fn category(slug: &str, description: &str) -> Category {
    Category {
        slug: slug.to_string(),
        description: description.to_string(),
    }
}

fn user(username: &str, name: &str, avatar_url: &str) -> User {
    User {
        username: username.to_string(),
        name: name.to_string(),
        avatar_url: avatar_url.to_string(),
    }
}

fn review(
    title: &str,
    designer: &str,
    owner: &str,
    review_body: &str,
    category: &str,
    created_at: &str,
    votes: i64,
) -> ReviewSeed {
    ReviewSeed {
        title: title.to_string(),
        designer: designer.to_string(),
        owner: owner.to_string(),
        review_img_url: DEFAULT_IMG.to_string(),
        review_body: review_body.to_string(),
        category: category.to_string(),
        created_at: at(created_at),
        votes,
    }
}

fn comment(body: &str, votes: i64, author: &str, review_id: i64, created_at: &str) -> CommentSeed {
    CommentSeed {
        body: body.to_string(),
        votes,
        author: author.to_string(),
        review_id,
        created_at: at(created_at),
    }
}

pub fn test_data() -> SeedData {
    SeedData {
        categories: vec![
            category("euro game", "Abstact games that involve little luck"),
            category(
                "social deduction",
                "Players attempt to uncover each other's hidden role",
            ),
            category("dexterity", "Games involving physical skill"),
            category("children's games", "Games suitable for children"),
        ],
        users: vec![
            user(
                "mallionaire",
                "haz",
                "https://www.healthytherapies.com/wp-content/uploads/2016/06/Lime3.jpg",
            ),
            user(
                "philippaclaire9",
                "philippa",
                "https://avatars2.githubusercontent.com/u/24604688?s=460&v=4",
            ),
            user(
                "bainesface",
                "sarah",
                "https://avatars2.githubusercontent.com/u/24394918?s=400&v=4",
            ),
            user(
                "dav3rid",
                "dave",
                "https://www.golenbock.com/wp-content/uploads/2015/01/placeholder-user.png",
            ),
        ],
        reviews: vec![
            review(
                "Agricola",
                "Uwe Rosenberg",
                "mallionaire",
                "Farmyard fun!",
                "euro game",
                "2021-01-18T10:00:20Z",
                1,
            ),
            review(
                "Jenga",
                "Leslie Scott",
                "philippaclaire9",
                "Fiddly fun for all the family",
                "dexterity",
                "2021-01-18T10:01:41Z",
                5,
            ),
            review(
                "Ultimate Werewolf",
                "Akihisa Okui",
                "bainesface",
                "We couldn't find the werewolf!",
                "social deduction",
                "2021-01-18T10:01:42Z",
                5,
            ),
            review(
                "Dolor reprehenderit",
                "Gamey McGameface",
                "mallionaire",
                LOREM,
                "social deduction",
                "2021-01-22T11:35:50Z",
                7,
            ),
            review(
                "Proident tempor et.",
                "Seymour Buttz",
                "mallionaire",
                LOREM,
                "social deduction",
                "2021-01-07T09:06:08Z",
                5,
            ),
            review(
                "Occaecat consequat officia in quis commodo.",
                "Ollie Tabooger",
                "mallionaire",
                LOREM,
                "social deduction",
                "2020-09-13T14:19:28Z",
                8,
            ),
            review(
                "Mollit elit qui incididunt veniam occaecat cupidatat",
                "Avery Wunzboogerz",
                "mallionaire",
                LOREM,
                "social deduction",
                "2021-01-25T11:16:54Z",
                9,
            ),
            review(
                "One Night Ultimate Werewolf",
                "Akihisa Okui",
                "mallionaire",
                "We couldn't find the werewolf!",
                "social deduction",
                "2021-01-18T10:02:00Z",
                5,
            ),
            review(
                "A truly Quacking Game; Quacks of Quedlinburg",
                "Wolfgang Warsch",
                "mallionaire",
                "Ever wish you could play a game over and over without having to do \
                 the same thing every time?",
                "social deduction",
                "2021-01-18T10:03:00Z",
                10,
            ),
            review(
                "Build you own tour de Yorkshire",
                "Asger Harding Granerud",
                "mallionaire",
                "Cold rain pours on the faces of your team of cyclists.",
                "social deduction",
                "2021-01-18T10:04:00Z",
                10,
            ),
            review(
                "That's just what an evil person would say!",
                "Fiona Lohoar",
                "mallionaire",
                "If you've ever wanted to accuse your boss of being a witch, here's your chance.",
                "social deduction",
                "2021-01-18T10:05:00Z",
                8,
            ),
            review(
                "Scythe; you're gonna need a bigger table!",
                "Jamey Stegmaier",
                "mallionaire",
                "Spend 30 minutes just setting up all of the boards before you play.",
                "social deduction",
                "2021-01-22T10:37:04Z",
                100,
            ),
            review(
                "Settlers of Catan: Don't Settle For Less",
                "Klaus Teuber",
                "mallionaire",
                "You have stumbled across an uncharted island rich in natural resources.",
                "social deduction",
                "1970-01-10T02:08:38Z",
                16,
            ),
        ],
        comments: vec![
            comment("I loved this game too!", 16, "bainesface", 2, "2017-11-22T12:43:33Z"),
            comment("My dog loved this game too!", 13, "mallionaire", 3, "2021-01-18T10:09:05Z"),
            comment(
                "I didn't know dogs could play games",
                10,
                "philippaclaire9",
                3,
                "2021-01-18T10:09:48Z",
            ),
            comment("EPIC board game!", 16, "bainesface", 2, "2017-11-22T12:36:03Z"),
            comment(
                "Now this is a story all about how, board games turned my life upside down",
                13,
                "mallionaire",
                2,
                "2021-01-18T10:24:05Z",
            ),
            comment(
                "Not sure about dogs, but my cat likes to get involved with board games",
                10,
                "philippaclaire9",
                3,
                "2021-03-27T19:49:48Z",
            ),
        ],
    }
}
