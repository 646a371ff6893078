//! Localized UI literals
//!
//! The defaults are the Korean strings the site ships with. They live in one
//! table so another locale can replace them without touching templates.

/// UI text used by the templates
#[derive(Debug, Clone)]
pub struct Strings {
    // Empty states
    pub empty_index: &'static str,
    pub empty_archive: &'static str,
    pub empty_search: &'static str,

    // Listing heads
    pub search_heading: &'static str,
    /// Follows the quoted query: `"q" 검색 결과입니다.`
    pub search_summary: &'static str,
    pub archive_tag: &'static str,
    pub archive_year: &'static str,
    pub archive_month: &'static str,
    pub archive_day: &'static str,
    pub not_found_title: &'static str,

    // Header search form
    pub search_label: &'static str,
    pub search_placeholder: &'static str,
    pub search_button: &'static str,

    // Pager
    pub prev_page: &'static str,
    pub next_page: &'static str,
    pub pager_label: &'static str,

    // Single post
    pub tags_label: &'static str,
    pub protected_notice: &'static str,
    pub password_label: &'static str,
    pub password_submit: &'static str,

    // Comments
    /// Heading is `{comments_title} {n}{comments_unit}`
    pub comments_title: &'static str,
    pub comments_unit: &'static str,
    pub comments_closed: &'static str,
    pub author_prefix: &'static str,
    pub pending_badge: &'static str,
    pub reply: &'static str,

    // Comment form
    pub form_title: &'static str,
    pub reply_title: &'static str,
    pub cancel_reply: &'static str,
    pub label_author: &'static str,
    pub label_email: &'static str,
    pub label_url: &'static str,
    pub label_comment: &'static str,
    pub submit: &'static str,
    pub error_required: &'static str,
    pub error_email: &'static str,
    pub error_url: &'static str,
    pub error_parent: &'static str,
}

impl Strings {
    pub fn korean() -> Self {
        Self {
            empty_index: "아직 게시물이 없습니다.",
            empty_archive: "조건에 맞는 게시물이 없습니다.",
            empty_search: "검색 결과가 없습니다.",

            search_heading: "검색 결과",
            search_summary: "검색 결과입니다.",
            archive_tag: "태그",
            archive_year: "연간",
            archive_month: "월간",
            archive_day: "일간",
            not_found_title: "페이지를 찾을 수 없습니다",

            search_label: "검색:",
            search_placeholder: "작품/배우/키워드 검색",
            search_button: "검색",

            prev_page: "이전",
            next_page: "다음",
            pager_label: "글 페이지 매기기",

            tags_label: "Post tags",
            protected_notice: "이 콘텐츠는 비밀번호로 보호되어 있습니다. 보려면 아래에 비밀번호를 입력하세요.",
            password_label: "비밀번호",
            password_submit: "확인",

            comments_title: "댓글",
            comments_unit: "개",
            comments_closed: "댓글이 닫혀 있습니다.",
            author_prefix: "작성자 - ",
            pending_badge: "승인 대기중",
            reply: "답글",

            form_title: "댓글 남기기",
            reply_title: "답글 남기기",
            cancel_reply: "답글 취소",
            label_author: "이름",
            label_email: "이메일",
            label_url: "웹사이트 (선택)",
            label_comment: "댓글",
            submit: "등록",
            error_required: "필수 항목입니다.",
            error_email: "올바른 이메일 주소를 입력하세요.",
            error_url: "http:// 또는 https:// 로 시작하는 주소를 입력하세요.",
            error_parent: "답글을 달 댓글을 찾을 수 없습니다.",
        }
    }
}

impl Default for Strings {
    fn default() -> Self {
        Self::korean()
    }
}
