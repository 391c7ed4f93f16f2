use leptos::prelude::*;
use leptos_ui::variants;

variants! {
    Button {
        base: "inline-flex items-center justify-center gap-1.5 whitespace-nowrap rounded-md text-xs font-medium transition-all disabled:pointer-events-none disabled:opacity-50 [&_svg]:pointer-events-none [&_svg:not([class*='size-'])]:size-3.5 shrink-0 [&_svg]:shrink-0 outline-none focus-visible:ring-ring/50 focus-visible:ring-[3px] hover:cursor-pointer select-none",
        variants: {
            variant: {
                Default: "bg-primary text-primary-foreground shadow-xs hover:bg-primary/90",
                Outline: "border bg-background shadow-xs hover:bg-accent hover:text-accent-foreground",
                Ghost: "hover:bg-accent hover:text-accent-foreground",
                Active: "border border-primary bg-primary/10 text-primary hover:bg-primary/20",
            },
            size: {
                Default: "h-8 px-3",
                Sm: "h-7 px-2",
                Icon: "size-7",
            }
        },
        component: {
            element: button,
            support_href: true,
            support_aria_current: true
        }
    }
}
