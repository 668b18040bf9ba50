//! Hash router: `#<pageId>?key=value&...` to a page.
//!
//! Resolution order: an enabled custom page with that id, then the fixed page
//! table, then `home`. `admin` needs an authenticated session and otherwise
//! lands on `login` with a redirect back.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::content::{Document, normalize_fragment};

pub const HOME: &str = "home";
pub const LOGIN: &str = "login";
pub const PROTECTED: &str = "admin";

/// Query keys the URL contract recognizes. Anything else is dropped.
pub const SUBJECT_PARAM: &str = "subject";
pub const ID_PARAM: &str = "id";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Home,
    Packages,
    HajjPackages,
    UmrahPackages,
    ExclusiveHajj,
    ExclusiveUmrah,
    Services,
    Visa,
    AirTicketing,
    Checklist,
    Gallery,
    Blog,
    BlogPost,
    About,
    Contact,
    Admin,
    Login,
}

/// Fixed page table. Dropdown parents (`hajj`, `umrah`) use placeholder hrefs
/// and land on their package listings; `book-now` is the contact form.
const FIXED_PAGES: &[(&str, Page)] = &[
    ("home", Page::Home),
    ("packages", Page::Packages),
    ("hajj", Page::HajjPackages),
    ("hajj-packages", Page::HajjPackages),
    ("umrah", Page::UmrahPackages),
    ("umrah-packages", Page::UmrahPackages),
    ("exclusive-hajj", Page::ExclusiveHajj),
    ("exclusive-umrah", Page::ExclusiveUmrah),
    ("services", Page::Services),
    ("visa", Page::Visa),
    ("air-ticketing", Page::AirTicketing),
    ("checklist", Page::Checklist),
    ("gallery", Page::Gallery),
    ("blog", Page::Blog),
    ("blog-post", Page::BlogPost),
    ("about", Page::About),
    ("contact", Page::Contact),
    ("book-now", Page::Contact),
    ("admin", Page::Admin),
    ("login", Page::Login),
];

impl Page {
    pub fn from_id(id: &str) -> Option<Self> {
        FIXED_PAGES
            .iter()
            .find(|(known, _)| *known == id)
            .map(|(_, page)| *page)
    }
}

/// A parsed fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Route {
    pub page: String,
    pub params: BTreeMap<String, String>,
}

impl Route {
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Back to `#page?k=v`, percent-encoding parameter values.
    pub fn to_fragment(&self) -> String {
        let mut out = format!("#{}", self.page);
        for (i, (key, value)) in self.params.iter().enumerate() {
            out.push(if i == 0 { '?' } else { '&' });
            out.push_str(&urlencoding::encode(key));
            out.push('=');
            out.push_str(&urlencoding::encode(value));
        }
        out
    }
}

/// Split `#page?k=v&...` into a route. Empty or missing fragments are `home`.
pub fn parse_fragment(fragment: &str) -> Route {
    let raw = normalize_fragment(fragment);
    let (page, query) = raw.split_once('?').unwrap_or((raw, ""));
    let page = if page.is_empty() { HOME } else { page };

    let params = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key), decode(value))
        })
        .collect();

    Route {
        page: page.to_string(),
        params,
    }
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub authenticated: bool,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated() -> Self {
        Self {
            authenticated: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "kebab-case")]
pub enum View {
    Page(Page),
    /// Rendered by the generic block template.
    Custom(String),
}

/// What to render for a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolution {
    pub view: View,
    /// Prefills the contact form.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Selects a blog post or similar detail view.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Fragment to return to after logging in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl Resolution {
    fn page(page: Page, route: &Route) -> Self {
        Self {
            view: View::Page(page),
            subject: route.param(SUBJECT_PARAM).map(str::to_string),
            id: route.param(ID_PARAM).map(str::to_string),
            redirect: None,
        }
    }

    pub fn is_page(&self, page: Page) -> bool {
        self.view == View::Page(page)
    }
}

pub fn resolve(route: &Route, document: &Document, session: Session) -> Resolution {
    // The protected page is never shadowed by a custom page.
    if route.page == PROTECTED {
        if !session.authenticated {
            debug!("admin requested without a session; redirecting to login");
            return Resolution {
                view: View::Page(Page::Login),
                subject: None,
                id: None,
                redirect: Some(route.to_fragment()),
            };
        }
        return Resolution::page(Page::Admin, route);
    }

    if let Some(custom) = document.enabled_custom_page(&route.page) {
        return Resolution {
            view: View::Custom(custom.key().to_string()),
            ..Resolution::page(Page::Home, route)
        };
    }

    let Some(page) = Page::from_id(&route.page) else {
        debug!(page = %route.page, "unknown page id; showing home");
        return Resolution::page(Page::Home, route);
    };
    Resolution::page(page, route)
}

/// Long-lived routing state with a manual history stack.
#[derive(Debug, Clone)]
pub struct Router {
    session: Session,
    current: Route,
    resolution: Resolution,
    history: Vec<Route>,
}

impl Router {
    /// Start from the fragment present at load time.
    pub fn new(initial: &str, document: &Document, session: Session) -> Self {
        let current = parse_fragment(initial);
        let resolution = resolve(&current, document, session);
        Self {
            session,
            current,
            resolution,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &Resolution {
        &self.resolution
    }

    pub fn route(&self) -> &Route {
        &self.current
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Handle a fragment change. Re-navigating to the current route is a no-op.
    pub fn navigate(&mut self, fragment: &str, document: &Document) -> &Resolution {
        let next = parse_fragment(fragment);
        if next == self.current {
            return &self.resolution;
        }
        let previous = std::mem::replace(&mut self.current, next);
        self.history.push(previous);
        self.resolution = resolve(&self.current, document, self.session);
        &self.resolution
    }

    /// Pop the history stack. `None` when there is nowhere to go back to.
    pub fn back(&mut self, document: &Document) -> Option<&Resolution> {
        let previous = self.history.pop()?;
        self.current = previous;
        self.resolution = resolve(&self.current, document, self.session);
        Some(&self.resolution)
    }

    /// Mark the session authenticated. A login screen shown for `admin`
    /// resolves to the admin page in place.
    pub fn sign_in(&mut self, document: &Document) -> &Resolution {
        self.session = Session::authenticated();
        self.resolution = resolve(&self.current, document, self.session);
        &self.resolution
    }

    pub fn sign_out(&mut self, document: &Document) -> &Resolution {
        self.session = Session::anonymous();
        self.resolution = resolve(&self.current, document, self.session);
        &self.resolution
    }
}
