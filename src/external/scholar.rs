//! Google Scholar profile scraping.
//!
//! A profile list page yields one row per publication; each row links to a
//! detail page holding the full author list, venue and description. Rows are
//! fetched in profile order, detail pages concurrently.

use super::urls::{url_scholar_absolute, url_scholar_profile};
use super::ExternalError;
use crate::config::ScholarConfig;
use crate::publication::model::{Category, CategoryType};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use log::{info, warn};
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;

const NO_DESCRIPTION: &str = "No description available.";

/// A publication shaped like the bulk-import payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedPublication {
    pub title: String,
    pub authors: Vec<String>,
    pub description: String,
    pub link: Option<String>,
    pub year_published: Option<i32>,
    pub cited_by: Option<i64>,
    pub category: Category,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScrapedPage {
    pub publications: Vec<ScrapedPublication>,
    pub retrieved: usize,
    /// No further pages exist after this one.
    pub end: bool,
}

#[async_trait]
pub trait ScholarSource: Send + Sync {
    async fn fetch_page(&self, author_id: &str, start: usize) -> Result<ScrapedPage, ExternalError>;
}

pub struct ScholarScraper {
    client: reqwest::Client,
    config: ScholarConfig,
}

impl ScholarScraper {
    pub fn new(client: reqwest::Client, config: ScholarConfig) -> Self {
        Self { client, config }
    }

    async fn get_html(&self, url: &str) -> Result<String, ExternalError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ExternalError::Http(format!("{} {}", status.as_u16(), url)));
        }
        Ok(resp.text().await?)
    }

    async fn complete_row(&self, row: ProfileRow) -> ScrapedPublication {
        let Some(href) = row.detail_href.clone() else {
            return row.into_publication(None);
        };
        let url = url_scholar_absolute(&self.config.base_url, &href);
        match self.get_html(&url).await {
            Ok(html) => match parse_detail_page(&html) {
                Ok(detail) => row.into_publication(Some(detail)),
                Err(e) => {
                    warn!("unparseable scholar detail page {}: {}", url, e);
                    row.into_publication(None)
                }
            },
            Err(e) => {
                warn!("failed to fetch scholar detail page {}: {}", url, e);
                row.into_publication(None)
            }
        }
    }
}

#[async_trait]
impl ScholarSource for ScholarScraper {
    async fn fetch_page(&self, author_id: &str, start: usize) -> Result<ScrapedPage, ExternalError> {
        let page_size = self.config.page_size.max(1);
        let url = url_scholar_profile(&self.config.base_url, author_id, start, page_size);
        let html = self.get_html(&url).await?;
        let rows = parse_profile_page(&html)?;
        info!("fetch_page({}, {}) [{}] {} rows", author_id, start, url, rows.len());

        let end = rows.len() < page_size;
        let publications: Vec<ScrapedPublication> = stream::iter(rows)
            .map(|row| self.complete_row(row))
            .buffered(self.config.threads.max(1))
            .collect()
            .await;

        Ok(ScrapedPage {
            retrieved: publications.len(),
            publications,
            end,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
struct ProfileRow {
    title: String,
    detail_href: Option<String>,
    authors: Vec<String>,
    venue: Option<String>,
    cited_by: Option<i64>,
    year: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct DetailPage {
    link: Option<String>,
    authors: Vec<String>,
    description: Option<String>,
    year: Option<i32>,
    category: Option<Category>,
}

impl ProfileRow {
    fn into_publication(self, detail: Option<DetailPage>) -> ScrapedPublication {
        let detail = detail.unwrap_or_default();
        let category = detail.category.unwrap_or_else(|| Category {
            category_type: CategoryType::Other,
            category_title: self.venue.clone(),
            ..Default::default()
        });
        ScrapedPublication {
            title: self.title,
            authors: if detail.authors.is_empty() {
                self.authors
            } else {
                detail.authors
            },
            description: detail
                .description
                .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            link: detail.link,
            year_published: detail.year.or(self.year),
            cited_by: self.cited_by,
            category,
        }
    }
}

fn selector(css: &str) -> Result<Selector, ExternalError> {
    Selector::parse(css).map_err(|e| ExternalError::InvalidResponse(format!("{e:?}")))
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn split_authors(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|a| a.trim())
        .filter(|a| !a.is_empty() && *a != "...")
        .map(str::to_string)
        .collect()
}

/// First run of four digits, e.g. "2020/5/1" or "Nature 12, 2020".
fn parse_year(raw: &str) -> Option<i32> {
    raw.split(|c: char| !c.is_ascii_digit())
        .find(|part| part.len() == 4)
        .and_then(|y| y.parse().ok())
}

fn parse_profile_page(html: &str) -> Result<Vec<ProfileRow>, ExternalError> {
    let doc = Html::parse_document(html);
    let row_sel = selector("tr.gsc_a_tr")?;
    let title_sel = selector("a.gsc_a_at")?;
    let gray_sel = selector("div.gs_gray")?;
    let cited_sel = selector("td.gsc_a_c a")?;
    let year_sel = selector("td.gsc_a_y span")?;

    let mut rows = Vec::new();
    for row in doc.select(&row_sel) {
        let Some(title_el) = row.select(&title_sel).next() else {
            continue;
        };
        let mut gray = row.select(&gray_sel);
        let authors = gray.next().map(|g| split_authors(&text_of(g))).unwrap_or_default();
        let venue = gray.next().map(text_of).filter(|v| !v.is_empty());

        rows.push(ProfileRow {
            title: text_of(title_el),
            detail_href: title_el.value().attr("href").map(str::to_string),
            authors,
            venue,
            cited_by: row
                .select(&cited_sel)
                .next()
                .and_then(|c| text_of(c).parse().ok()),
            year: row.select(&year_sel).next().and_then(|y| parse_year(&text_of(y))),
        });
    }
    Ok(rows)
}

fn parse_detail_page(html: &str) -> Result<DetailPage, ExternalError> {
    let doc = Html::parse_document(html);
    let link_sel = selector("a.gsc_oci_title_link")?;
    let field_row_sel = selector("div.gs_scl")?;
    let field_sel = selector("div.gsc_oci_field")?;
    let value_sel = selector("div.gsc_oci_value")?;

    let mut detail = DetailPage {
        link: doc
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string),
        ..Default::default()
    };
    let mut category = Category::default();
    let mut venue_seen = false;

    for field_row in doc.select(&field_row_sel) {
        let (Some(field), Some(value)) = (
            field_row.select(&field_sel).next().map(text_of),
            field_row.select(&value_sel).next().map(text_of),
        ) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        match field.as_str() {
            "Authors" | "Inventors" => detail.authors = split_authors(&value),
            "Publication date" => detail.year = parse_year(&value),
            "Description" => detail.description = Some(value),
            "Journal" => {
                category.category_type = CategoryType::Journal;
                category.category_title = Some(value);
                venue_seen = true;
            }
            "Conference" => {
                category.category_type = CategoryType::Conference;
                category.category_title = Some(value);
                venue_seen = true;
            }
            "Book" => {
                category.category_type = CategoryType::Book;
                category.category_title = Some(value);
                venue_seen = true;
            }
            "Source" => {
                category.category_title = Some(value);
                venue_seen = true;
            }
            "Volume" => category.volume = Some(value),
            "Issue" => category.issue = Some(value),
            "Pages" => category.pages = Some(value),
            "Publisher" => category.publisher = Some(value),
            _ => {}
        }
    }

    if venue_seen || category.publisher.is_some() {
        detail.category = Some(category);
    }
    Ok(detail)
}
