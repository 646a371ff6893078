// Demo content: OTT reviews, tags and comment threads to showcase the theme
//
// Used by `ott-trendy seed` (writes into the configured database) and
// `ott-trendy serve --demo` (in-memory database, nothing touches disk).
//
// Key features demonstrated:
// - More posts than fit on one page (pager on the home page)
// - Tag and date archives
// - A password-protected post (password: "ott")
// - A post with comments closed
// - A reply chain deeper than the nesting cap, plus a pending comment

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};

use crate::content::{ApprovalState, CommentFields, ContentRepository, NewItem, SqliteRepository};

/// Password of the protected demo post
pub const DEMO_PASSWORD: &str = "ott";

struct DemoPost {
    slug: &'static str,
    title: &'static str,
    days_ago: i64,
    tags: &'static [(&'static str, &'static str)],
    body: &'static str,
    thumbnail: bool,
}

const NETFLIX: (&str, &str) = ("netflix", "넷플릭스");
const DISNEY: (&str, &str) = ("disney-plus", "디즈니플러스");
const DRAMA: (&str, &str) = ("drama", "드라마");
const MOVIE: (&str, &str) = ("movie", "영화");
const SF: (&str, &str) = ("sf", "SF");
const THRILLER: (&str, &str) = ("thriller", "스릴러");

const POSTS: &[DemoPost] = &[
    DemoPost {
        slug: "squid-game-2",
        title: "오징어 게임 시즌 2 리뷰",
        days_ago: 1,
        tags: &[NETFLIX, DRAMA, THRILLER],
        body: "<p>3년 만에 돌아온 게임은 더 커졌고 더 잔인해졌다. 기훈의 선택은 시즌 1보다 훨씬 무겁고, 새로운 참가자들의 사연은 짧지만 강렬하다.</p>\
               <p>다만 중반부의 투표 장면은 반복적으로 느껴질 수 있다. 그럼에도 마지막 두 에피소드의 긴장감은 시리즈 최고 수준이다.</p>",
        thumbnail: true,
    },
    DemoPost {
        slug: "dune-part-two",
        title: "듄: 파트 2, 극장 다음은 스트리밍으로",
        days_ago: 3,
        tags: &[MOVIE, SF],
        body: "<p>사막의 스케일은 작은 화면에서도 여전히 압도적이다. 폴과 챠니의 관계가 중심에 서면서 1편보다 감정선이 또렷해졌다.</p>\
               <p>사운드가 절반인 영화이니 헤드폰을 권한다.</p>",
        thumbnail: true,
    },
    DemoPost {
        slug: "the-glory",
        title: "더 글로리 정주행 후기",
        days_ago: 6,
        tags: &[NETFLIX, DRAMA],
        body: "<p>복수극의 공식을 따르면서도 인물 하나하나의 동기를 끝까지 밀어붙인다. 연진과 동은의 대치 장면은 몇 번을 다시 봐도 숨이 막힌다.</p>",
        thumbnail: false,
    },
    DemoPost {
        slug: "moving",
        title: "무빙: 초능력보다 가족 이야기",
        days_ago: 9,
        tags: &[DISNEY, DRAMA],
        body: "<p>초능력 액션을 기대하고 봤다가 부모 세대의 이야기에 울게 되는 드라마. 20부작이 길게 느껴지지 않는다.</p>",
        thumbnail: true,
    },
    DemoPost {
        slug: "interstellar-rewatch",
        title: "다시 보는 우주 영화 세 편",
        days_ago: 12,
        tags: &[MOVIE, SF],
        body: "<p>주말에 몰아서 보기 좋은 우주 영화 세 편을 골랐다. 각각 러닝타임과 추천 포인트를 정리했다.</p>",
        thumbnail: false,
    },
    DemoPost {
        slug: "black-mirror-7",
        title: "블랙 미러 시즌 7, 기술보다 사람",
        days_ago: 15,
        tags: &[NETFLIX, SF, THRILLER],
        body: "<p>이번 시즌은 기술 자체보다 그 기술을 쓰는 사람의 선택에 집중한다. 에피소드별 편차는 있지만 첫 화는 꼭 보길 권한다.</p>",
        thumbnail: false,
    },
    DemoPost {
        slug: "casino",
        title: "카지노: 최민식의 원맨쇼",
        days_ago: 20,
        tags: &[DISNEY, DRAMA, THRILLER],
        body: "<p>필리핀을 배경으로 한 범죄 드라마. 시즌 1의 느린 전개를 견디면 시즌 2에서 확실히 보상받는다.</p>",
        thumbnail: false,
    },
    DemoPost {
        slug: "parasite-streaming",
        title: "기생충, 스트리밍으로 다시 볼 때 보이는 것들",
        days_ago: 26,
        tags: &[MOVIE, THRILLER],
        body: "<p>두 번째 관람에서는 계단과 창문이 전부 다르게 보인다. 공간 연출에 집중해서 다시 보기를 추천한다.</p>",
        thumbnail: false,
    },
    DemoPost {
        slug: "weekly-picks",
        title: "이번 주 OTT 신작 추천",
        days_ago: 31,
        tags: &[NETFLIX, DISNEY],
        body: "<p>이번 주 공개된 신작 중 볼 만한 작품을 플랫폼별로 정리했다.</p><ul><li>넷플릭스: 다큐 시리즈 한 편</li><li>디즈니플러스: 애니메이션 한 편</li></ul>",
        thumbnail: false,
    },
    DemoPost {
        slug: "andor",
        title: "안도르: 스타워즈를 몰라도 괜찮다",
        days_ago: 40,
        tags: &[DISNEY, SF, DRAMA],
        body: "<p>광선검 없는 스타워즈. 정치 스릴러에 가까운 이야기가 오히려 시리즈 입문자에게 잘 맞는다.</p>",
        thumbnail: false,
    },
    DemoPost {
        slug: "my-name",
        title: "마이 네임 액션 장면 모음",
        days_ago: 55,
        tags: &[NETFLIX, THRILLER],
        body: "<p>한소희의 액션은 합이 아니라 체력으로 밀어붙이는 느낌이라 더 사실적이다.</p>",
        thumbnail: false,
    },
    DemoPost {
        slug: "members-only",
        title: "멤버 전용: 시즌 결산 스포일러 토크",
        days_ago: 60,
        tags: &[DRAMA],
        body: "<p>올해 본 드라마의 결말을 전부 이야기한다. 스포일러 주의.</p>",
        thumbnail: false,
    },
];

/// What `seed` inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub items: usize,
    pub comments: usize,
}

fn commenter(name: &str, email: &str, body: &str, parent: Option<i64>) -> CommentFields {
    CommentFields {
        author: name.to_string(),
        email: email.to_string(),
        url: String::new(),
        body: body.to_string(),
        parent_id: parent,
    }
}

/// Fill an empty repository with demo posts and comments.
///
/// Does nothing when the repository already has posts.
pub fn seed(repo: &SqliteRepository, now: DateTime<Utc>) -> anyhow::Result<SeedSummary> {
    if repo.count_items()? > 0 {
        tracing::info!("Repository already has content, skipping demo seed");
        return Ok(SeedSummary::default());
    }

    let mut summary = SeedSummary::default();
    let mut ids = Vec::with_capacity(POSTS.len());

    for post in POSTS {
        let item = NewItem {
            slug: post.slug.to_string(),
            title: post.title.to_string(),
            published_at: now - Duration::days(post.days_ago),
            body: post.body.to_string(),
            excerpt: None,
            thumbnail: post.thumbnail.then(|| crate::content::Thumbnail {
                url: format!("/media/{}.jpg", post.slug),
                alt: post.title.to_string(),
            }),
            password: (post.slug == "members-only").then(|| DEMO_PASSWORD.to_string()),
            comments_open: post.slug != "parasite-streaming",
            tags: post
                .tags
                .iter()
                .map(|(slug, name)| (slug.to_string(), name.to_string()))
                .collect(),
        };
        let id = repo
            .insert_item(&item)
            .with_context(|| format!("Failed to seed '{}'", post.slug))?;
        ids.push(id);
        summary.items += 1;
    }

    // A reply chain on the newest post, deeper than the default cap of 3
    let squid = ids[0];
    let at = |minutes: i64| now - Duration::days(1) + Duration::minutes(minutes);
    let voices = [
        ("민지", "minji@example.com", "시즌 1보다 훨씬 어두워졌네요."),
        ("준호", "junho@example.com", "저는 오히려 그래서 좋았어요."),
        ("민지", "minji@example.com", "투표 장면은 좀 길지 않았나요?"),
        ("서연", "seoyeon@example.com", "그 장면이 시즌 3 떡밥이라던데요."),
        ("준호", "junho@example.com", "맞아요, 마지막 화 보면 이해됩니다."),
    ];
    let mut parent = None;
    for (i, (name, email, body)) in voices.iter().enumerate() {
        let comment = repo.insert_comment(
            squid,
            &commenter(name, email, body, parent),
            ApprovalState::Approved,
            at(i as i64 * 10),
        )?;
        parent = Some(comment.id);
        summary.comments += 1;
    }

    let standalone = [
        (squid, "하늘", "sky@example.com", "OST도 정말 좋아요.", ApprovalState::Approved),
        (squid, "익명", "anon@example.com", "스포 없이 보고 싶었는데...", ApprovalState::Pending),
        (ids[1], "도윤", "doyun@example.com", "IMAX로 못 본 게 한이네요.", ApprovalState::Approved),
        (ids[2], "지아", "jia@example.com", "주말 내내 정주행했습니다.\n\n시즌 2도 나오면 좋겠어요.", ApprovalState::Approved),
    ];
    for (i, (item_id, name, email, body, state)) in standalone.into_iter().enumerate() {
        repo.insert_comment(
            item_id,
            &commenter(name, email, body, None),
            state,
            at(60 + i as i64 * 5),
        )?;
        summary.comments += 1;
    }

    tracing::info!(
        items = summary.items,
        comments = summary.comments,
        "Demo content seeded"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ListFilter;

    #[test]
    fn test_seed_fills_empty_repository_once() {
        let repo = SqliteRepository::in_memory().unwrap();
        let now = Utc::now();

        let summary = seed(&repo, now).unwrap();
        assert_eq!(summary.items, POSTS.len());
        assert_eq!(summary.comments, 9);
        assert_eq!(repo.count_items().unwrap(), POSTS.len() as u64);

        // Second run is a no-op
        assert_eq!(seed(&repo, now).unwrap(), SeedSummary::default());
        assert_eq!(repo.count_items().unwrap(), POSTS.len() as u64);
    }

    #[test]
    fn test_seed_covers_theme_features() {
        let repo = SqliteRepository::in_memory().unwrap();
        seed(&repo, Utc::now()).unwrap();

        // More than one page at the default 10 per page
        let page = repo.list_items(&ListFilter::All, 1, 10).unwrap();
        assert_eq!(page.total_pages, 2);

        let locked = repo.get_item("members-only").unwrap().unwrap();
        assert!(locked.is_protected());
        let closed = repo.get_item("parasite-streaming").unwrap().unwrap();
        assert!(!closed.comments_open);

        let squid = repo.get_item("squid-game-2").unwrap().unwrap();
        let public = repo.get_comments(squid.id, None).unwrap();
        assert_eq!(public.len(), 6);
        let with_pending = repo.get_comments(squid.id, Some("anon@example.com")).unwrap();
        assert_eq!(with_pending.len(), 7);

        assert_eq!(repo.tag_name("sf").unwrap().as_deref(), Some("SF"));
    }
}
