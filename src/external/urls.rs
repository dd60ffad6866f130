/// Twitter API v2
pub const TWITTER_API_URL: &str = "https://api.twitter.com/2";
pub fn url_twitter_user_by_username(handle: &str) -> String {
    format!("{}/users/by/username/{}", TWITTER_API_URL, handle)
}

/// GitHub REST API
pub const GITHUB_API_URL: &str = "https://api.github.com";
pub const URL_GITHUB_USER: &str = "https://api.github.com/user";
pub const URL_GITHUB_OAUTH_TOKEN: &str = "https://github.com/login/oauth/access_token";

/// `<login>.github.io`, the repository GitHub Pages serves for a user.
pub fn pages_repo_name(login: &str) -> String {
    format!("{}.github.io", login)
}
pub fn url_github_pages_repo(login: &str) -> String {
    format!("{}/repos/{}/{}", GITHUB_API_URL, login, pages_repo_name(login))
}
pub fn url_github_pages_branch_ref(login: &str) -> String {
    format!("{}/git/refs/heads/gh-pages", url_github_pages_repo(login))
}

/// Deploy service
pub fn url_deploy(base: &str, team_id: &str) -> String {
    format!("{}/deploy/{}", base.trim_end_matches('/'), team_id)
}

/// Google Scholar
pub fn url_scholar_profile(
    base: &str,
    author_id: &str,
    start: usize,
    page_size: usize,
) -> String {
    format!(
        "{}/citations?hl=en&user={}&cstart={}&pagesize={}&view_op=list_works&sortby=pubdate",
        base.trim_end_matches('/'),
        author_id,
        start,
        page_size
    )
}
pub fn url_scholar_absolute(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            href.trim_start_matches('/')
        )
    }
}
