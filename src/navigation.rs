//! The side bar on desktop and the tab bar on mobile.

use maud::{Markup, html};

use crate::endpoints;

/// The pages reachable from the navigation, in display order.
const PAGES: [(&str, &str); 6] = [
    (endpoints::DASHBOARD_VIEW, "Dashboard"),
    (endpoints::TRANSACTIONS_VIEW, "Transactions"),
    (endpoints::ANALYTICS_VIEW, "Analytics"),
    (endpoints::TRANSFER_VIEW, "Transfer"),
    (endpoints::VERIFICATION_VIEW, "Verification"),
    (endpoints::SECURITY_VIEW, "Security"),
];

/// How many pages fit in the mobile tab bar, the rest go under "More".
const TAB_BAR_PAGES: usize = 3;

const SIDE_LINK_STYLE: &str = "flex items-center w-full gap-3 px-4 py-2.5 rounded-lg \
    text-base font-medium text-gray-800 hover:bg-gray-100 hover:text-blue-600 \
    dark:text-gray-200 dark:hover:bg-gray-700";
const SIDE_LINK_ACTIVE_STYLE: &str = "flex items-center w-full gap-3 px-4 py-2.5 rounded-lg \
    text-base font-medium text-white shadow-lg bg-gradient-to-r from-blue-500 to-indigo-600";

const TAB_STYLE: &str = "flex items-center justify-center w-full px-2 py-2 rounded-lg \
    text-xs font-semibold text-gray-600 hover:text-blue-700 dark:text-gray-300";
const TAB_ACTIVE_STYLE: &str = "flex items-center justify-center w-full px-2 py-2 rounded-lg \
    text-xs font-semibold bg-blue-50 text-blue-700 dark:bg-blue-900/30 dark:text-blue-200";

/// A page link and whether it points at the page being shown.
#[derive(Debug, Clone, Copy)]
struct Link {
    url: &'static str,
    title: &'static str,
    is_current: bool,
}

/// The navigation for a page, with the link to that page highlighted.
pub struct NavBar {
    links: Vec<Link>,
}

impl NavBar {
    /// Highlight the link whose URL equals `active_endpoint`, if any.
    pub fn new(active_endpoint: &str) -> NavBar {
        let links = PAGES
            .into_iter()
            .map(|(url, title)| Link {
                url,
                title,
                is_current: active_endpoint == url,
            })
            .collect();

        NavBar { links }
    }

    pub fn into_html(self) -> Markup {
        let (tabs, overflow) = self.links.split_at(TAB_BAR_PAGES.min(self.links.len()));
        let overflow_is_current = overflow.iter().any(|link| link.is_current);

        html!(
            aside
                class="hidden lg:flex fixed left-0 top-0 z-30 h-screen w-64 flex-col
                border-r border-gray-200 bg-white shadow-lg dark:border-gray-700 dark:bg-gray-800"
            {
                a href=(endpoints::ROOT) class="flex items-center gap-3 px-6 py-8 border-b border-gray-200 dark:border-gray-700"
                {
                    span
                        class="flex items-center justify-center w-10 h-10 rounded-xl text-lg font-bold
                        text-white shadow-lg bg-gradient-to-br from-blue-500 to-indigo-600"
                    {
                        "P"
                    }
                    span class="text-xl font-bold text-blue-600 dark:text-blue-400" { "Pocketbank" }
                }

                nav class="flex-1 px-3 py-6 overflow-y-auto" aria-label="Primary"
                {
                    ul class="space-y-2"
                    {
                        @for link in &self.links {
                            li { (side_link(link)) }
                        }
                    }
                }

                div class="p-4 border-t border-gray-200 dark:border-gray-700"
                {
                    (theme_toggle())
                }
            }

            nav
                class="lg:hidden fixed inset-x-0 bottom-0 z-40 border-t border-gray-200
                bg-white/95 backdrop-blur dark:border-gray-700 dark:bg-gray-900/95"
                aria-label="Primary"
            {
                ul class="grid grid-cols-4 gap-2 px-4 py-3"
                {
                    @for link in tabs {
                        li class="min-w-0" { (tab_link(link)) }
                    }

                    li class="min-w-0"
                    {
                        details class="relative"
                        {
                            summary
                                class={ "list-none cursor-pointer " (tab_style(overflow_is_current)) }
                                aria-current=[overflow_is_current.then_some("page")]
                            {
                                "More"
                            }

                            ul
                                class="absolute bottom-full right-0 mb-3 w-44 space-y-1 rounded-xl p-2
                                border border-gray-200 bg-white shadow-xl dark:border-gray-700 dark:bg-gray-900"
                            {
                                @for link in overflow {
                                    li { (tab_link(link)) }
                                }
                                li { (theme_toggle()) }
                            }
                        }
                    }
                }
            }
        )
    }
}

fn side_link(link: &Link) -> Markup {
    let style = if link.is_current {
        SIDE_LINK_ACTIVE_STYLE
    } else {
        SIDE_LINK_STYLE
    };

    html!(
        a href=(link.url) class=(style) aria-current=[link.is_current.then_some("page")]
        {
            (link.title)
        }
    )
}

fn tab_style(is_current: bool) -> &'static str {
    if is_current {
        TAB_ACTIVE_STYLE
    } else {
        TAB_STYLE
    }
}

fn tab_link(link: &Link) -> Markup {
    html!(
        a
            href=(link.url)
            class=(tab_style(link.is_current))
            aria-current=[link.is_current.then_some("page")]
        {
            span class="truncate" { (link.title) }
        }
    )
}

/// Switches between the light and dark theme, see `static/app.js`.
fn theme_toggle() -> Markup {
    html!(
        button
            type="button"
            data-theme-toggle
            class="flex items-center w-full gap-3 px-4 py-2.5 rounded-lg text-sm font-medium
            text-gray-700 hover:bg-gray-100 dark:text-gray-200 dark:hover:bg-gray-700"
        {
            span class="dark:hidden" { "Dark mode" }
            span class="hidden dark:inline" { "Light mode" }
        }
    )
}
