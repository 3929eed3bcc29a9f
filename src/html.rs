use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::{
    kyc::VerificationStatus,
    transaction::{Category, TransactionStatus},
};

// Link styles
pub const LINK_STYLE: &str = "text-blue-600 hover:text-blue-500 \
    dark:text-blue-500 dark:hover:text-blue-400 underline";

// Button styles
pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 bg-blue-500 \
    dark:bg-blue-600 disabled:bg-blue-700 hover:enabled:bg-blue-600 \
    hover:enabled:dark:bg-blue-700 text-white rounded";

pub const BUTTON_SECONDARY_STYLE: &str = "w-full py-2 px-4 \
    text-sm font-medium text-gray-900 bg-white rounded border border-gray-200 \
    hover:bg-gray-100 hover:text-blue-700 focus:z-10 dark:bg-gray-800 \
    dark:text-gray-400 dark:border-gray-600 dark:hover:text-white \
    dark:hover:bg-gray-700";

pub const BUTTON_DELETE_STYLE: &str = "text-red-600 hover:text-red-500 \
    dark:text-red-500 dark:hover:text-red-400 underline bg-transparent \
    border-none cursor-pointer";

// Form styles
pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white disabled:text-gray-500 bg-gray-50 \
    dark:bg-gray-700 border border-gray-300 dark:border-gray-600 \
    dark:placeholder-gray-400 focus:ring-blue-600 focus:border-blue-600 \
    focus:dark:border-blue-500 focus:dark:ring-blue-500";
pub const FORM_ERROR_STYLE: &str = "text-red-500 text-base";

// Table styles
pub const TABLE_HEADER_STYLE: &str = "text-xs text-gray-700 uppercase \
    bg-gray-50 dark:bg-gray-700 dark:text-gray-400";

pub const TABLE_ROW_STYLE: &str = "bg-white border-b dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-6 py-4";

pub const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md";

// Page container
pub const PAGE_CONTAINER_STYLE: &str = "flex flex-col gap-6 px-2 lg:px-6 py-8 mx-auto \
    max-w-screen-xl text-gray-900 dark:text-white";

const BADGE_STYLE: &str = "inline-flex items-center px-2.5 py-0.5 text-xs \
    font-semibold rounded-full";

pub enum HeadElement {
    /// The file path or URL to a JavaScript script.
    ScriptLink(String),
    /// JavaScript source code.
    ScriptSource(PreEscaped<String>),
}

pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Pocketbank" }

                // Apply the saved theme before the first paint.
                script
                {
                    (PreEscaped(r#"if (localStorage.getItem("theme") === "dark") {
                        document.documentElement.classList.add("dark");
                    }"#))
                }
                script src="https://unpkg.com/@tailwindcss/browser@4" {}
                style type="text/tailwindcss"
                {
                    (PreEscaped("@custom-variant dark (&:where(.dark, .dark *));"))
                }
                script src="https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js" {}
                script src="https://unpkg.com/htmx-ext-response-targets@2.0.4/response-targets.js" {}

                style
                {
                    r#"
                    .htmx-indicator {
                        display: none;
                    }

                    .htmx-request .htmx-indicator,
                    .htmx-request.htmx-indicator {
                        display: inline;
                    }

                    .echarts-tooltip {
                        z-index: 30 !important;
                    }
                    "#
                }

                @for element in head_elements
                {
                    @match element
                    {
                        HeadElement::ScriptSource(text) => script { (text) }
                        HeadElement::ScriptLink(path) => script src=(path) {}
                    }
                }

                script src="/static/app.js" defer {}
            }

            body
                hx-ext="response-targets"
                class="min-h-screen bg-gray-50 dark:bg-gray-900 pb-[calc(5rem+env(safe-area-inset-bottom))] lg:pb-0 lg:pl-64"
            {
                (content)

                // Alert container for out-of-band swaps
                div
                    id="alert-container"
                    class="w-full max-w-md px-4"
                    style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
                {}
            }
        }
    }
}

pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    // Template adapted from https://flowbite.com/blocks/marketing/404/
    let content = html!(
        section class="bg-white dark:bg-gray-900"
        {
            div class="py-8 px-4 mx-auto max-w-screen-xl lg:py-16 lg:px-6"
            {
                div class="mx-auto max-w-screen-sm text-center"
                {
                    h1
                        class="mb-4 text-7xl tracking-tight font-extrabold
                            lg:text-9xl text-blue-600 dark:text-blue-500"
                    {
                        (header)
                    }

                    p
                        class="mb-4 text-3xl md:text-4xl tracking-tight
                            font-bold text-gray-900 dark:text-white"
                    {
                        (description)
                    }

                    p
                        class="mb-4 text-1xl md:text-2xl tracking-tight
                            text-gray-900 dark:text-white"
                    {
                        (fix)
                    }

                    a
                        href="/"
                        class="inline-flex text-white bg-blue-600
                            hover:bg-blue-800 focus:ring-4 focus:outline-hidden
                            focus:ring-blue-300 font-medium rounded text-sm px-5
                            py-2.5 text-center dark:focus:ring-blue-900 my-4"
                    {
                        "Back to Dashboard"
                    }
                }
            }
        }
    );

    base(title, &[], &content)
}

/// The heading and tagline at the top of each page.
pub fn page_header(title: &str, subtitle: &str) -> Markup {
    html! {
        header class="space-y-2"
        {
            h1 class="text-4xl font-bold" { (title) }
            p class="text-lg text-gray-600 dark:text-gray-400" { (subtitle) }
        }
    }
}

/// A card showing a single headline figure.
///
/// `value_style` is appended to the value's classes, e.g. to colour income green.
pub fn stat_card(label: &str, value: &str, detail: Option<&str>, value_style: &str) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            p class="text-sm font-medium text-gray-600 dark:text-gray-400" { (label) }
            p class={ "text-2xl font-bold " (value_style) } { (value) }
            @if let Some(detail) = detail {
                p class="text-xs text-gray-500 dark:text-gray-400" { (detail) }
            }
        }
    }
}

pub fn badge(text: &str, colour_style: &str) -> Markup {
    html! {
        span class={ (BADGE_STYLE) " " (colour_style) } { (text) }
    }
}

pub fn category_badge(category: Category) -> Markup {
    let colour = match category {
        Category::Food => "bg-orange-100 text-orange-800",
        Category::Transport => "bg-blue-100 text-blue-800",
        Category::Shopping => "bg-pink-100 text-pink-800",
        Category::Bills => "bg-red-100 text-red-800",
        Category::Income => "bg-green-100 text-green-800",
        Category::Entertainment => "bg-purple-100 text-purple-800",
        Category::Health => "bg-cyan-100 text-cyan-800",
        Category::Other => "bg-gray-100 text-gray-800",
    };

    badge(category.as_str(), colour)
}

pub fn transaction_status_badge(status: TransactionStatus) -> Markup {
    let colour = match status {
        TransactionStatus::Completed => "bg-green-100 text-green-800",
        TransactionStatus::Pending => "bg-yellow-100 text-yellow-800",
        TransactionStatus::Failed => "bg-red-100 text-red-800",
    };

    badge(status.label(), colour)
}

pub fn verification_badge(status: VerificationStatus) -> Markup {
    let colour = match status {
        VerificationStatus::Verified => "bg-green-100 text-green-800",
        VerificationStatus::InProgress => "bg-blue-100 text-blue-800",
        VerificationStatus::PendingReview => "bg-yellow-100 text-yellow-800",
        VerificationStatus::Rejected => "bg-red-100 text-red-800",
        VerificationStatus::NotStarted => "bg-gray-100 text-gray-800",
    };

    badge(status.label(), colour)
}

/// A horizontal bar filled to `percent`.
pub fn progress_bar(percent: f64) -> Markup {
    let percent = percent.clamp(0.0, 100.0);

    html! {
        div
            class="w-full h-2 bg-gray-200 rounded-full dark:bg-gray-700"
            role="progressbar"
            aria-valuemin="0"
            aria-valuemax="100"
            aria-valuenow=(format!("{percent:.0}"))
        {
            div class="h-2 bg-blue-600 rounded-full" style=(format!("width: {percent:.0}%")) {}
        }
    }
}

pub fn password_input(
    name: &str,
    label: &str,
    placeholder: &str,
    error_message: Option<&str>,
) -> Markup {
    html! {
        div
        {
            label
                for=(name)
                class=(FORM_LABEL_STYLE)
            {
                (label)
            }

            input
                type="password"
                name=(name)
                id=(name)
                placeholder=(placeholder)
                class=(FORM_TEXT_INPUT_STYLE)
                required;

            @if let Some(error_message) = error_message
            {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }
        }
    }
}

pub fn loading_spinner() -> Markup {
    // Spinner SVG adapted from https://flowbite.com/docs/components/spinner/
    html! {
        svg
            aria-hidden="true"
            role="status"
            class="inline text-white w-4 h-4 me-2 mb-1 animate-spin"
            viewBox="0 0 100 101"
            fill="none"
            xmlns="http://www.w3.org/2000/svg"
        {
            path
                d="M100 50.5908C100 78.2051 77.6142 100.591 50 100.591C22.3858 100.591 0 78.2051 0 50.5908C0 22.9766 22.3858 0.59082 50 0.59082C77.6142 0.59082 100 22.9766 100 50.5908ZM9.08144 50.5908C9.08144 73.1895 27.4013 91.5094 50 91.5094C72.5987 91.5094 90.9186 73.1895 90.9186 50.5908C90.9186 27.9921 72.5987 9.67226 50 9.67226C27.4013 9.67226 9.08144 27.9921 9.08144 50.5908Z"
                fill="#E5E7EB" {}
            path
                d="M93.9676 39.0409C96.393 38.4038 97.8624 35.9116 97.0079 33.5539C95.2932 28.8227 92.871 24.3692 89.8167 20.348C85.8452 15.1192 80.8826 10.7238 75.2124 7.41289C69.5422 4.10194 63.2754 1.94025 56.7698 1.05124C51.7666 0.367541 46.6976 0.446843 41.7345 1.27873C39.2613 1.69328 37.813 4.19778 38.4501 6.62326C39.0873 9.04874 41.5694 10.4717 44.0505 10.1071C47.8511 9.54855 51.7191 9.52689 55.5402 10.0491C60.8642 10.7766 65.9928 12.5457 70.6331 15.2552C75.2735 17.9648 79.3347 21.5619 82.5849 25.841C84.9175 28.9121 86.7997 32.2913 88.1811 35.8758C89.083 38.2158 91.5421 39.6781 93.9676 39.0409Z"
                fill="currentColor" {}
        }
    }
}

/// A link with blue text for use in a <p> tag.
pub fn link(url: &str, text: &str) -> Markup {
    html! (
        a href=(url) class=(LINK_STYLE) { (text) }
    )
}
